use error_stack::Report;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|v| {
            let mut lines = Vec::new();
            flatten_errors(&v, &mut Vec::new(), &mut lines);

            lines
                .into_iter()
                .fold(Report::new(Wrapper), Report::attach_printable)
        })
    }
}

/// Flattens nested validation errors into `field.path: message` lines.
pub fn flatten_errors(errors: &ValidationErrors, path: &mut Vec<String>, out: &mut Vec<String>) {
    let mut fields = errors.errors().iter().collect::<Vec<_>>();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        path.push((*field).to_string());
        match kind {
            ValidationErrorsKind::Struct(inner) => flatten_errors(inner, path, out),
            ValidationErrorsKind::List(list) => {
                for (index, inner) in list {
                    path.push(index.to_string());
                    flatten_errors(inner, path, out);
                    path.pop();
                }
            }
            ValidationErrorsKind::Field(messages) => {
                let field_str = path.join(".");
                for error in messages {
                    let message = error.message.as_deref().unwrap_or(&error.code);
                    out.push(format!("{field_str}: {message}"));
                }
            }
        }
        path.pop();
    }
}
