use thiserror::Error;

use crate::{
    http::Error,
    store::DataStore,
    types::{self, id::UserId},
    util::Sensitive,
};

#[derive(Debug, Error)]
#[error("Could not find user specified")]
struct UserNotFound;

async fn ensure_target(store: &dyn DataStore, target: UserId) -> Result<(), Error> {
    if store.get_user(target).await?.is_none() {
        return Err(Error::from_context(types::Error::NotFound, UserNotFound));
    }
    Ok(())
}

#[derive(Debug)]
pub struct FollowUser {
    pub target: Sensitive<UserId>,
}

impl FollowUser {
    #[tracing::instrument(skip(store, viewer), name = "services.follows.follow")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
        let target = *self.target.value();
        if viewer == target {
            return Err(Error::new(types::Error::invalid_request(
                "You cannot follow yourself",
            )));
        }

        super::ensure_viewer(store, viewer).await?;
        ensure_target(store, target).await?;

        if !store.follow(viewer, target).await? {
            tracing::debug!("viewer already follows the target user");
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct UnfollowUser {
    pub target: Sensitive<UserId>,
}

impl UnfollowUser {
    #[tracing::instrument(skip(store, viewer), name = "services.follows.unfollow")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
        let target = *self.target.value();
        if viewer == target {
            return Err(Error::new(types::Error::invalid_request(
                "You cannot unfollow yourself",
            )));
        }

        super::ensure_viewer(store, viewer).await?;
        ensure_target(store, target).await?;

        if !store.unfollow(viewer, target).await? {
            tracing::debug!("viewer was not following the target user");
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::test_utils::assert_error_type,
        store::{memory::MemoryStore, RelationshipStore},
    };

    fn follow(target: UserId) -> FollowUser {
        FollowUser {
            target: Sensitive::new(target),
        }
    }

    fn unfollow(target: UserId) -> UnfollowUser {
        UnfollowUser {
            target: Sensitive::new(target),
        }
    }

    #[tokio::test]
    async fn should_reject_if_target_user_not_found() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");

        let result = follow(UserId::new(2_000_000)).perform(&store, alice).await;
        assert_error_type(result, &types::Error::NotFound);
    }

    #[tokio::test]
    async fn should_not_follow_themselves() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");

        let result = follow(alice).perform(&store, alice).await;
        assert_error_type(
            result,
            &types::Error::invalid_request("You cannot follow yourself"),
        );
        assert!(!store.is_following(alice, alice).await.unwrap());
    }

    #[tokio::test]
    async fn should_follow_if_done_repeatedly() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");

        follow(bob).perform(&store, alice).await.unwrap();
        follow(bob).perform(&store, alice).await.unwrap();

        assert!(store.is_following(alice, bob).await.unwrap());
        assert_eq!(store.follower_count(bob).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_unfollow_user() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");

        follow(bob).perform(&store, alice).await.unwrap();
        unfollow(bob).perform(&store, alice).await.unwrap();
        unfollow(bob).perform(&store, alice).await.unwrap();

        assert!(!store.is_following(alice, bob).await.unwrap());
        assert_eq!(store.following_count(alice).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_reject_deleted_viewer() {
        let store = MemoryStore::new();
        let bob = store.insert_user("bob");

        let result = follow(bob).perform(&store, UserId::new(404)).await;
        assert_error_type(result, &types::Error::Unauthorized);
    }
}
