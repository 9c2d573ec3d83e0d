use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, Ready};
use thiserror::Error;

use super::{Error, Jwt};
use crate::{types, types::id::UserId, App};

/// Who is performing the request, taken from the bearer token.
///
/// The user id is not looked up here. Reads accept ids of users that
/// no longer exist and writes check the viewer themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(UserId),
}

impl Actor {
    pub fn user_id(self) -> Result<UserId, Error> {
        #[derive(Debug, Error)]
        #[error("Attempt to access user-only route")]
        struct Unauthorized;

        match self {
            Self::User(id) => Ok(id),
            Self::Anonymous => Err(Error::from_context(
                types::Error::Unauthorized,
                Unauthorized,
            )),
        }
    }

    fn from_bearer_token(req: &actix_web::HttpRequest) -> Result<Self, Error> {
        #[derive(Debug, Error)]
        #[error("The web app has no available configuration")]
        struct NoConfig;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Ok(Self::Anonymous);
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            return Err(Error::from_context(types::Error::Internal, NoConfig));
        };

        let jwt = Jwt::decode(token, &app.config)?;
        Ok(Self::User(jwt.user_id))
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Self::from_bearer_token(req))
    }
}
