use chrono::NaiveDateTime;
use sea_query::{Expr, Iden, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{ImageId, LikeId, UserId},
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum LikeIdent {
    Likes,
    Id,
    CreatedAt,
    UserId,
    ImageId,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Like {
    pub id: LikeId,
    pub created_at: NaiveDateTime,
    pub user_id: UserId,
    pub image_id: ImageId,
}

impl Like {
    pub(crate) fn insert_stmt(user_id: UserId, image_id: ImageId) -> (String, SqlxValues) {
        Query::insert()
            .into_table(LikeIdent::Likes)
            .columns([LikeIdent::UserId, LikeIdent::ImageId])
            .values_panic([user_id.into(), image_id.into()])
            .on_conflict(
                OnConflict::columns([LikeIdent::UserId, LikeIdent::ImageId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    pub(crate) fn delete_stmt(user_id: UserId, image_id: ImageId) -> (String, SqlxValues) {
        Query::delete()
            .from_table(LikeIdent::Likes)
            .and_where(Expr::col(LikeIdent::UserId).eq(user_id))
            .and_where(Expr::col(LikeIdent::ImageId).eq(image_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    /// Returns `None` if the user already liked the image.
    #[tracing::instrument(skip_all, name = "db.likes.insert")]
    pub async fn insert(
        conn: &mut Connection,
        user_id: UserId,
        image_id: ImageId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Self::insert_stmt(user_id, image_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.likes.delete")]
    pub async fn delete(
        conn: &mut Connection,
        user_id: UserId,
        image_id: ImageId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Self::delete_stmt(user_id, image_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}
