use chrono::NaiveDateTime;
use sea_query::{Iden, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{ImageId, TagId},
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum TagIdent {
    Tags,
    Id,
    CreatedAt,
    ImageId,
    Name,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub created_at: NaiveDateTime,
    pub image_id: ImageId,
    pub name: String,
}

impl Tag {
    /// `None` if there are no names to insert.
    pub(crate) fn insert_stmt(
        image_id: ImageId,
        names: &[String],
    ) -> Option<(String, SqlxValues)> {
        if names.is_empty() {
            return None;
        }

        let mut query = Query::insert();
        query
            .into_table(TagIdent::Tags)
            .columns([TagIdent::ImageId, TagIdent::Name]);

        for name in names {
            query.values_panic([image_id.into(), name.as_str().into()]);
        }

        let stmt = query
            .on_conflict(
                OnConflict::columns([TagIdent::ImageId, TagIdent::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        Some(stmt)
    }

    /// Tags `image_id` with every name given. Repeated names are
    /// stored once.
    #[tracing::instrument(skip_all, name = "db.tags.insert")]
    pub async fn insert_many(
        conn: &mut Connection,
        image_id: ImageId,
        names: &[String],
    ) -> Result<Vec<Self>> {
        let Some((sql, values)) = Self::insert_stmt(image_id, names) else {
            return Ok(Vec::new());
        };

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}
