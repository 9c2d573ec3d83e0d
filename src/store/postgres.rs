use async_trait::async_trait;
use error_stack::ResultExt;
use sqlx::Connection as _;

use super::{ContentStore, RelationshipStore, UserDirectory};
use crate::{
    config,
    database::{self, ErrorExt, ErrorExt2, PoolConnection, Result},
    schema::{
        Comment, Follow, Image, ImageWithCounts, InsertComment, InsertImage, Like, Tag,
        UpdateUser, User,
    },
    types::id::{CommentId, ImageId, UserId},
};

/// Postgres backed store. Reads go to the replica when one is
/// configured and healthy, writes always go to the primary.
#[derive(Debug, Clone)]
pub struct PgStore {
    primary: database::Pool,
    replica: Option<database::Pool>,
}

impl PgStore {
    #[tracing::instrument(skip_all, name = "db.store.connect")]
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let primary = database::Pool::new(cfg, &cfg.primary).await?;
        let replica = if let Some(replica) = cfg.replica.as_ref() {
            Some(database::Pool::new(cfg, replica).await?)
        } else {
            None
        };

        Ok(Self { primary, replica })
    }

    /// Applies pending migrations on the primary database.
    pub async fn migrate(&self) -> Result<()> {
        self.primary.migrate().await
    }

    #[tracing::instrument(skip_all)]
    pub async fn db_write(&self) -> Result<PoolConnection> {
        self.primary.get().await
    }

    #[tracing::instrument(skip_all)]
    pub async fn db_read(&self) -> Result<PoolConnection> {
        if let Some(replica) = self.replica.as_ref() {
            match replica.get().await {
                Ok(conn) => return Ok(conn),
                // fallback
                Err(err) if err.is_unhealthy() => {
                    tracing::warn!("replica database is unhealthy, reading from primary");
                }
                Err(err) => return Err(err),
            }
        }
        self.primary.get().await
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let mut conn = self.db_read().await?;
        User::find(&mut conn, id).await
    }

    async fn update_user(&self, changes: &UpdateUser) -> Result<Option<User>> {
        let mut conn = self.db_write().await?;
        if changes.is_empty() {
            return User::find(&mut conn, changes.id).await;
        }
        changes.update(&mut conn).await
    }
}

#[async_trait]
impl RelationshipStore for PgStore {
    async fn follower_count(&self, user_id: UserId) -> Result<u64> {
        let mut conn = self.db_read().await?;
        Follow::count_followers(&mut conn, user_id).await
    }

    async fn following_count(&self, user_id: UserId) -> Result<u64> {
        let mut conn = self.db_read().await?;
        Follow::count_following(&mut conn, user_id).await
    }

    async fn is_following(&self, follower: UserId, followee: UserId) -> Result<bool> {
        if follower == followee {
            return Ok(false);
        }

        let mut conn = self.db_read().await?;
        Follow::exists(&mut conn, follower, followee).await
    }

    async fn follow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        // self edges are rejected by the follows table
        if follower == followee {
            return Ok(false);
        }

        let mut conn = self.db_write().await?;
        let edge = Follow::insert(&mut conn, follower, followee)
            .await
            .attach_printable("could not insert follow edge")?;

        Ok(edge.is_some())
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let edge = Follow::delete(&mut conn, follower, followee)
            .await
            .attach_printable("could not delete follow edge")?;

        Ok(edge.is_some())
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn images_with_counts(&self, owner_id: UserId) -> Result<Vec<ImageWithCounts>> {
        let mut conn = self.db_read().await?;
        ImageWithCounts::list_by_owner(&mut conn, owner_id).await
    }

    async fn find_image(&self, id: ImageId) -> Result<Option<Image>> {
        let mut conn = self.db_read().await?;
        Image::find(&mut conn, id).await
    }

    async fn post_image(&self, image: &InsertImage<'_>) -> Result<Image> {
        let mut conn = self.db_write().await?;
        let mut tx = conn.begin().await.into_db_error()?;

        let row = image.insert(&mut tx).await?;
        Tag::insert_many(&mut tx, row.id, image.tags)
            .await
            .attach_printable("could not tag image")?;

        tx.commit().await.into_db_error()?;
        Ok(row)
    }

    async fn like(&self, user_id: UserId, image_id: ImageId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let like = Like::insert(&mut conn, user_id, image_id).await?;
        Ok(like.is_some())
    }

    async fn unlike(&self, user_id: UserId, image_id: ImageId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let like = Like::delete(&mut conn, user_id, image_id).await?;
        Ok(like.is_some())
    }

    async fn comment(&self, comment: &InsertComment<'_>) -> Result<Comment> {
        let mut conn = self.db_write().await?;
        comment.insert(&mut conn).await
    }

    async fn delete_comment(&self, id: CommentId, author_id: UserId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let comment = Comment::delete(&mut conn, id, author_id).await?;
        Ok(comment.is_some())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn offline_store() -> PgStore {
        PgStore {
            primary: database::Pool::unreachable(),
            replica: None,
        }
    }

    #[tokio::test]
    async fn self_edges_never_reach_the_database() {
        let store = offline_store();
        let alice = UserId::new(1);

        assert!(!store.follow(alice, alice).await.unwrap());
        assert!(!store.is_following(alice, alice).await.unwrap());
    }

    #[tokio::test]
    async fn offline_primary_is_unhealthy() {
        let store = offline_store();
        let error = store.get_user(UserId::new(1)).await.unwrap_err();
        assert!(error.is_unhealthy());
    }
}
