use chrono::NaiveDateTime;
use sea_query::{Asterisk, Expr, Iden, PostgresQueryBuilder, Query, SimpleExpr};
use sea_query_binder::{SqlxBinder, SqlxValues};
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::UserId,
};

#[derive(Debug, Clone, Copy, Iden)]
pub enum UserIdent {
    Users,
    Id,
    CreatedAt,
    Username,
    Name,
    Bio,
    Website,
    Email,
    Phone,
    Gender,
    ProfileImageUrl,
    UpdatedAt,
}

/// Account record owned by the account service. This server only
/// reads it and applies explicit profile updates.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub profile_image_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    pub(crate) fn find_stmt(id: UserId) -> (String, SqlxValues) {
        // SELECT * FROM users WHERE id = $1
        Query::select()
            .column(Asterisk)
            .from(UserIdent::Users)
            .and_where(Expr::col(UserIdent::Id).eq(id))
            .build_sqlx(PostgresQueryBuilder)
    }

    #[tracing::instrument(skip_all, name = "db.users.find")]
    pub async fn find(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        let (sql, values) = Self::find_stmt(id);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

/// Explicit set of changes to a user's profile. Fields left as
/// `None` are not touched; `Some(None)` clears an optional column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub id: UserId,
    pub name: Option<String>,
    pub bio: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub gender: Option<Option<String>>,
    pub profile_image_url: Option<Option<String>>,
}

impl UpdateUser {
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            bio: None,
            website: None,
            phone: None,
            gender: None,
            profile_image_url: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.website.is_none()
            && self.phone.is_none()
            && self.gender.is_none()
            && self.profile_image_url.is_none()
    }

    /// Applies the changes on an already loaded user.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(bio) = &self.bio {
            user.bio.clone_from(bio);
        }
        if let Some(website) = &self.website {
            user.website.clone_from(website);
        }
        if let Some(phone) = &self.phone {
            user.phone.clone_from(phone);
        }
        if let Some(gender) = &self.gender {
            user.gender.clone_from(gender);
        }
        if let Some(url) = &self.profile_image_url {
            user.profile_image_url.clone_from(url);
        }
    }

    fn changeset(&self) -> Vec<(UserIdent, SimpleExpr)> {
        let mut changes = Vec::new();
        if let Some(name) = &self.name {
            changes.push((UserIdent::Name, name.clone().into()));
        }

        let optionals = [
            (UserIdent::Bio, &self.bio),
            (UserIdent::Website, &self.website),
            (UserIdent::Phone, &self.phone),
            (UserIdent::Gender, &self.gender),
            (UserIdent::ProfileImageUrl, &self.profile_image_url),
        ];

        for (column, value) in optionals {
            if let Some(value) = value {
                changes.push((column, value.clone().into()));
            }
        }

        changes.push((
            UserIdent::UpdatedAt,
            Expr::cust("(now() AT TIME ZONE 'utc')"),
        ));
        changes
    }

    pub(crate) fn update_stmt(&self) -> (String, SqlxValues) {
        // UPDATE users SET ... WHERE id = $n RETURNING *
        Query::update()
            .table(UserIdent::Users)
            .values(self.changeset())
            .and_where(Expr::col(UserIdent::Id).eq(self.id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder)
    }

    /// Writes the changes and returns the updated user, or `None`
    /// if the user does not exist.
    #[tracing::instrument(skip_all, name = "db.users.update")]
    pub async fn update(&self, conn: &mut Connection) -> Result<Option<User>> {
        let (sql, values) = self.update_stmt();
        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}
