use chrono::NaiveDateTime;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Error;
use crate::{config, types, types::id::UserId};

/// Bearer token claims. Tokens are issued by the account service with
/// the shared secret; this server only needs to learn who is asking.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Jwt {
    pub created_at: NaiveDateTime,
    pub issuer: String,
    pub user_id: UserId,
}

#[derive(Debug, Error)]
#[error("Invalid or malformed access token")]
struct InvalidToken;

impl Jwt {
    #[tracing::instrument(skip_all, name = "http.jwt.decode")]
    pub fn decode(token: &str, cfg: &config::Server) -> Result<Self, Error> {
        let key = DecodingKey::from_secret(cfg.jwt_secret.as_str().as_bytes());
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        jsonwebtoken::decode::<Self>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let report = error_stack::Report::new(e).change_context(InvalidToken);
                Error::from_report(types::Error::Unauthorized, report)
            })
    }
}

// Tokens are minted by the account service.
#[cfg(test)]
impl Jwt {
    pub const ISSUER: &'static str = "pictogram";

    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            created_at: chrono::Utc::now().naive_utc(),
            issuer: Self::ISSUER.into(),
            user_id,
        }
    }

    pub fn encode(&self, cfg: &config::Server) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{EncodingKey, Header};

        let header = Header::new(Algorithm::HS512);
        let key = EncodingKey::from_secret(cfg.jwt_secret.as_str().as_bytes());
        jsonwebtoken::encode(&header, self, &key)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let cfg = config::Server::for_tests();
        let jwt = Jwt::new(UserId::new(7));

        let token = jwt.encode(&cfg).unwrap();
        assert_eq!(Jwt::decode(&token, &cfg).unwrap(), jwt);
    }

    #[test]
    fn test_rejects_foreign_tokens() {
        let cfg = config::Server::for_tests();
        let token = Jwt::new(UserId::new(7)).encode(&cfg).unwrap();

        let mut other = config::Server::for_tests();
        other.jwt_secret = crate::util::Sensitive::new("a-completely-different-key".into());

        let error = Jwt::decode(&token, &other).unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);

        let error = Jwt::decode("garbage", &cfg).unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);
    }
}
