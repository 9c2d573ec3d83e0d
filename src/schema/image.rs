use chrono::NaiveDateTime;
use sea_query::{
    Alias, Asterisk, Expr, Func, Iden, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr,
};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use super::{CommentIdent, LikeIdent};
use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{ImageId, UserId},
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum ImageIdent {
    Images,
    Id,
    CreatedAt,
    OwnerId,
    Url,
    Caption,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub created_at: NaiveDateTime,
    pub owner_id: UserId,
    pub url: String,
    pub caption: Option<String>,
}

impl Image {
    pub(crate) fn find_stmt(id: ImageId) -> (String, SqlxValues) {
        Query::select()
            .column(Asterisk)
            .from(ImageIdent::Images)
            .and_where(Expr::col(ImageIdent::Id).eq(id))
            .build_sqlx(PostgresQueryBuilder)
    }

    #[tracing::instrument(skip_all, name = "db.images.find")]
    pub async fn find(conn: &mut Connection, id: ImageId) -> Result<Option<Self>> {
        let (sql, values) = Self::find_stmt(id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertImage<'a> {
    pub owner_id: UserId,
    pub url: &'a str,
    pub caption: Option<&'a str>,
    /// Stored in the `tags` table alongside the image.
    pub tags: &'a [String],
}

impl InsertImage<'_> {
    pub(crate) fn insert_stmt(&self) -> (String, SqlxValues) {
        Query::insert()
            .into_table(ImageIdent::Images)
            .columns([ImageIdent::OwnerId, ImageIdent::Url, ImageIdent::Caption])
            .values_panic([
                self.owner_id.into(),
                self.url.into(),
                self.caption.map(str::to_string).into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    #[tracing::instrument(skip_all, name = "db.images.insert")]
    pub async fn insert(&self, conn: &mut Connection) -> Result<Image> {
        let (sql, values) = self.insert_stmt();
        sqlx::query_as_with::<_, Image, _>(&sql, values)
            .fetch_one(conn)
            .await
            .into_db_error()
    }
}

/// An image row together with its like and comment tallies.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ImageWithCounts {
    pub id: ImageId,
    pub url: String,
    pub like_count: i64,
    pub comment_count: i64,
}

/// `(SELECT COUNT(*) FROM <table> WHERE <table>.image_id = images.id)`
fn count_per_image<T>(table: T, image_id: T) -> SimpleExpr
where
    T: Iden + Copy + 'static,
{
    let subquery: SelectStatement = Query::select()
        .expr(Func::count(Expr::col(Asterisk)))
        .from(table)
        .and_where(Expr::col((table, image_id)).equals((ImageIdent::Images, ImageIdent::Id)))
        .take();

    SimpleExpr::SubQuery(None, Box::new(subquery.into_sub_query_statement()))
}

impl ImageWithCounts {
    pub(crate) fn list_by_owner_stmt(owner_id: UserId) -> (String, SqlxValues) {
        // Tallies are correlated subqueries so a profile page costs one
        // round trip regardless of how many images the owner has.
        Query::select()
            .column((ImageIdent::Images, ImageIdent::Id))
            .column((ImageIdent::Images, ImageIdent::Url))
            .expr_as(
                count_per_image(LikeIdent::Likes, LikeIdent::ImageId),
                Alias::new("like_count"),
            )
            .expr_as(
                count_per_image(CommentIdent::Comments, CommentIdent::ImageId),
                Alias::new("comment_count"),
            )
            .from(ImageIdent::Images)
            .and_where(Expr::col((ImageIdent::Images, ImageIdent::OwnerId)).eq(owner_id))
            .order_by((ImageIdent::Images, ImageIdent::Id), Order::Asc)
            .build_sqlx(PostgresQueryBuilder)
    }

    /// Lists every image of the owner ordered by image id, oldest first.
    #[tracing::instrument(skip_all, name = "db.images.list_with_counts")]
    pub async fn list_by_owner(conn: &mut Connection, owner_id: UserId) -> Result<Vec<Self>> {
        let (sql, values) = Self::list_by_owner_stmt(owner_id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}
