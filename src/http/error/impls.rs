use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use validator::ValidationErrors;

use super::Error;
use crate::{database, services::profile::ProfileError, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
            ErrorType::InvalidFormBody(..) | ErrorType::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            ErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if matches!(self.error_type, ErrorType::Internal) {
            tracing::error!(error = ?self.report, "request failed with an internal error");
        }
        HttpResponse::build(self.status_code()).json(&self.error_type)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Readonly => Error::from_report(ErrorType::ReadonlyMode, value),
            database::Error::MissingReference => Error::from_report(ErrorType::NotFound, value),
            _ => Error::from_report(ErrorType::Internal, value),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::from_context(ErrorType::InvalidFormBody(value.clone()), value)
    }
}

impl From<Report<ProfileError>> for Error {
    fn from(value: Report<ProfileError>) -> Self {
        match value.current_context() {
            ProfileError::UserNotFound => Error::from_report(ErrorType::NotFound, value),
            ProfileError::Store => Error::from_report(ErrorType::Internal, value),
        }
    }
}
