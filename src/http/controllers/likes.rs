use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::{
    http::{Actor, Error},
    services::{LikeImage, UnlikeImage},
    util::Sensitive,
    App,
};

#[tracing::instrument(skip_all, name = "http.likes.like")]
pub async fn like(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = LikeImage {
        image: Sensitive::new(parse_id(&path)?),
    };

    request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip_all, name = "http.likes.unlike")]
pub async fn unlike(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = UnlikeImage {
        image: Sensitive::new(parse_id(&path)?),
    };

    request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}
