use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;
use validator::ValidationErrors;

/// Error returned to API clients. The variant name becomes the
/// `type` field of the JSON body.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
    Internal,
    InvalidFormBody(ValidationErrors),
    InvalidRequest { message: Cow<'static, str> },
    NotFound,
    ReadonlyMode,
    Unauthorized,
}

impl Error {
    #[must_use]
    pub fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Internal => f.write_str("Failed to perform request"),
            Error::InvalidFormBody(..) => f.write_str("User performed request with invalid body"),
            Error::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
            Error::NotFound => f.write_str("Resource not found"),
            Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
            Error::Unauthorized => f.write_str("Authentication required"),
        }
    }
}
