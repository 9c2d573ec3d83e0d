use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::{
    http::{Actor, Error},
    services::{FollowUser, UnfollowUser},
    util::Sensitive,
    App,
};

#[tracing::instrument(skip_all, name = "http.follows.follow")]
pub async fn follow(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = FollowUser {
        target: Sensitive::new(parse_id(&path)?),
    };

    request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip_all, name = "http.follows.unfollow")]
pub async fn unfollow(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = UnfollowUser {
        target: Sensitive::new(parse_id(&path)?),
    };

    request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}
