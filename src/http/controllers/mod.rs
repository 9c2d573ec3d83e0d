use actix_web::{error::JsonPayloadError, web, HttpRequest};
use thiserror::Error;

use crate::{
    http::Error,
    types::{
        self,
        id::{marker::Marker, Id},
    },
};

pub mod comments;
pub mod follows;
pub mod images;
pub mod likes;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/users")
                .route("/me", web::put().to(users::edit_profile))
                .route("/me/profile-image", web::put().to(users::set_profile_image))
                .route("/{user_id}", web::get().to(users::profile)),
        )
        .service(
            web::resource("/follows/{user_id}")
                .route(web::post().to(follows::follow))
                .route(web::delete().to(follows::unfollow)),
        )
        .service(
            web::resource("/likes/{image_id}")
                .route(web::post().to(likes::like))
                .route(web::delete().to(likes::unlike)),
        )
        .service(
            web::scope("/images")
                .route("", web::post().to(images::post_image))
                .route("/{image_id}/comments", web::post().to(images::post_comment)),
        )
        .route(
            "/comments/{comment_id}",
            web::delete().to(comments::delete_comment),
        );
}

fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    #[derive(Debug, Error)]
    #[error("Could not parse request body")]
    struct InvalidBody;

    let message = error.to_string();
    Error::from_context(types::Error::invalid_request(message), InvalidBody).into()
}

/// Parses an id out of a path segment.
pub(crate) fn parse_id<T: Marker>(segment: &str) -> Result<Id<T>, Error> {
    segment
        .parse::<Id<T>>()
        .map_err(|e| Error::from_context(types::Error::invalid_request("Invalid id in path"), e))
}
