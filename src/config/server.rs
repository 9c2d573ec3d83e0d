use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport, Sensitive};

#[derive(Debug, Deserialize, Validate)]
pub struct Server {
    #[validate]
    pub db: super::Database,
    /// Secret key used to verify bearer tokens issued by the
    /// account service.
    ///
    /// **Environment variables**:
    /// - `PICTOGRAM_JWT_SECRET`
    #[validate(custom = "validate_jwt_secret")]
    pub jwt_secret: Sensitive<String>,
    #[serde(default)]
    pub http: super::Http,
    #[serde(default)]
    pub logging: super::Logging,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "pictogram.toml";

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for [`Server::load`]
    /// and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // One big con about figment (env provider to be specific) especially
            // these fields with underscore in it.
            .merge(Env::prefixed("PICTOGRAM_").map(|v| match v.as_str() {
                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

                "JWT_SECRET" => "jwt_secret".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "db.primary.url".into()),
            )
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use super::{Database, DbPoolConfig};
        use std::num::NonZeroU32;

        Self {
            db: Database {
                primary: DbPoolConfig {
                    readonly: false,
                    min_idle: None,
                    pool_size: NonZeroU32::MIN,
                    url: Sensitive::new("postgres://localhost/pictogram_test".into()),
                },
                replica: None,
                enforce_tls: false,
                timeout_secs: std::num::NonZeroU64::MIN,
            },
            jwt_secret: Sensitive::new("this-is-a-very-secret-test-key".into()),
            http: super::Http::default(),
            logging: super::Logging::default(),
        }
    }
}

fn validate_jwt_secret(value: &Sensitive<String>) -> std::result::Result<(), ValidationError> {
    if (12..=1024).contains(&value.as_str().len()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some("Invalid JWT secret key".into());
        Err(error)
    }
}
