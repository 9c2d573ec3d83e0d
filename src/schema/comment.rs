use chrono::NaiveDateTime;
use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{CommentId, ImageId, UserId},
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum CommentIdent {
    Comments,
    Id,
    CreatedAt,
    AuthorId,
    ImageId,
    Content,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub created_at: NaiveDateTime,
    pub author_id: UserId,
    pub image_id: ImageId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertComment<'a> {
    pub author_id: UserId,
    pub image_id: ImageId,
    pub content: &'a str,
}

impl InsertComment<'_> {
    pub(crate) fn insert_stmt(&self) -> (String, SqlxValues) {
        Query::insert()
            .into_table(CommentIdent::Comments)
            .columns([
                CommentIdent::AuthorId,
                CommentIdent::ImageId,
                CommentIdent::Content,
            ])
            .values_panic([
                self.author_id.into(),
                self.image_id.into(),
                self.content.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    pub async fn insert(&self, conn: &mut Connection) -> Result<Comment> {
        let (sql, values) = self.insert_stmt();
        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_one(conn)
            .await
            .into_db_error()
    }
}

impl Comment {
    pub(crate) fn delete_stmt(id: CommentId, author_id: UserId) -> (String, SqlxValues) {
        Query::delete()
            .from_table(CommentIdent::Comments)
            .and_where(Expr::col(CommentIdent::Id).eq(id))
            .and_where(Expr::col(CommentIdent::AuthorId).eq(author_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    /// Deletes the comment only if `author_id` wrote it.
    #[tracing::instrument(skip_all, name = "db.comments.delete")]
    pub async fn delete(
        conn: &mut Connection,
        id: CommentId,
        author_id: UserId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Self::delete_stmt(id, author_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::bound_values;

    #[test]
    fn delete_is_scoped_to_author() {
        let (sql, values) = Comment::delete_stmt(CommentId::new(4), UserId::new(2));
        assert_eq!(
            sql,
            r#"DELETE FROM "comments" WHERE "id" = $1 AND "author_id" = $2 RETURNING *"#
        );
        assert_eq!(bound_values(&values), 2);
    }

    #[test]
    fn insert_binds_content() {
        let comment = InsertComment {
            author_id: UserId::new(2),
            image_id: ImageId::new(4),
            content: "nice shot",
        };
        let (sql, values) = comment.insert_stmt();
        assert!(!sql.contains("nice shot"));
        assert_eq!(bound_values(&values), 3);
    }
}
