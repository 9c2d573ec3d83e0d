use chrono::NaiveDateTime;
use sea_query::{
    Asterisk, Expr, Func, Iden, OnConflict, PostgresQueryBuilder, Query,
};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{FollowId, UserId},
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum FollowIdent {
    Follows,
    Id,
    CreatedAt,
    FollowerId,
    FollowingId,
}

/// A directed edge meaning `follower_id` follows `following_id`.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Follow {
    pub id: FollowId,
    pub created_at: NaiveDateTime,
    pub follower_id: UserId,
    pub following_id: UserId,
}

impl Follow {
    fn count_stmt(column: FollowIdent, user_id: UserId) -> (String, SqlxValues) {
        Query::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from(FollowIdent::Follows)
            .and_where(Expr::col(column).eq(user_id))
            .build_sqlx(PostgresQueryBuilder)
    }

    pub(crate) fn exists_stmt(follower_id: UserId, following_id: UserId) -> (String, SqlxValues) {
        Query::select()
            .expr(Expr::exists(
                Query::select()
                    .column(Asterisk)
                    .from(FollowIdent::Follows)
                    .and_where(Expr::col(FollowIdent::FollowerId).eq(follower_id))
                    .and_where(Expr::col(FollowIdent::FollowingId).eq(following_id))
                    .take(),
            ))
            .build_sqlx(PostgresQueryBuilder)
    }

    pub(crate) fn insert_stmt(follower_id: UserId, following_id: UserId) -> (String, SqlxValues) {
        Query::insert()
            .into_table(FollowIdent::Follows)
            .columns([FollowIdent::FollowerId, FollowIdent::FollowingId])
            .values_panic([follower_id.into(), following_id.into()])
            .on_conflict(
                OnConflict::columns([FollowIdent::FollowerId, FollowIdent::FollowingId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    pub(crate) fn delete_stmt(follower_id: UserId, following_id: UserId) -> (String, SqlxValues) {
        Query::delete()
            .from_table(FollowIdent::Follows)
            .and_where(Expr::col(FollowIdent::FollowerId).eq(follower_id))
            .and_where(Expr::col(FollowIdent::FollowingId).eq(following_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    async fn count(conn: &mut Connection, column: FollowIdent, user_id: UserId) -> Result<u64> {
        let (sql, values) = Self::count_stmt(column, user_id);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(conn)
            .await
            .into_db_error()?;

        Ok(count.unsigned_abs())
    }

    /// Number of users following `user_id`.
    #[tracing::instrument(skip_all, name = "db.follows.count_followers")]
    pub async fn count_followers(conn: &mut Connection, user_id: UserId) -> Result<u64> {
        Self::count(conn, FollowIdent::FollowingId, user_id).await
    }

    /// Number of users `user_id` follows.
    #[tracing::instrument(skip_all, name = "db.follows.count_following")]
    pub async fn count_following(conn: &mut Connection, user_id: UserId) -> Result<u64> {
        Self::count(conn, FollowIdent::FollowerId, user_id).await
    }

    #[tracing::instrument(skip_all, name = "db.follows.exists")]
    pub async fn exists(
        conn: &mut Connection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<bool> {
        let (sql, values) = Self::exists_stmt(follower_id, following_id);
        sqlx::query_scalar_with::<_, bool, _>(&sql, values)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    /// Returns `None` if the edge was already there.
    #[tracing::instrument(skip_all, name = "db.follows.insert")]
    pub async fn insert(
        conn: &mut Connection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Self::insert_stmt(follower_id, following_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// Returns `None` if there was no edge to remove.
    #[tracing::instrument(skip_all, name = "db.follows.delete")]
    pub async fn delete(
        conn: &mut Connection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Self::delete_stmt(follower_id, following_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}
