use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::{
    http::{Actor, Error},
    services::{PostComment, PostImage},
    types::form,
    util::Sensitive,
    App,
};

#[tracing::instrument(skip_all, name = "http.images.post")]
pub async fn post_image(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<form::images::PostImage>,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = PostImage {
        form: form.into_inner(),
    };

    let response = request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::Created().json(response))
}

#[tracing::instrument(skip_all, name = "http.images.comment")]
pub async fn post_comment(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
    form: web::Json<form::images::PostComment>,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = PostComment {
        image: Sensitive::new(parse_id(&path)?),
        form: form.into_inner(),
    };

    let response = request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::Created().json(response))
}
