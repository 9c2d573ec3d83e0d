use crate::types;
use error_stack::{Context, Report};
use thiserror::Error as ThisError;
use tracing_error::SpanTrace;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level context of every report carried by [`Error`]. The frames
/// below it keep whatever caused the request to fail.
#[derive(Debug, ThisError)]
#[error("Failed to process request")]
pub struct RequestError;

/// Error returned by controllers and services. Clients only ever see
/// the [error type](types::Error); the report and span trace are kept
/// for the logs.
pub struct Error {
    error_type: types::Error,
    report: Report<RequestError>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn new(error_type: types::Error) -> Self {
        Self {
            error_type,
            report: Report::new(RequestError),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
        Self::from_report(error_type, Report::new(context))
    }

    #[must_use]
    pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
        Self {
            error_type,
            report: report.change_context(RequestError),
            trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    #[must_use]
    pub fn as_type(&self) -> &types::Error {
        &self.error_type
    }

    #[cfg(test)]
    #[must_use]
    pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
        self.report.downcast_ref::<F>()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("type", &self.error_type)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}
