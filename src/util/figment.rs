use error_stack::{Context, Report};

// We need to dissect the error of figment so that
// we can get more info on why server configuration
// fails to parse (from a file or environment vars)
pub trait FigmentErrorAttachable<T: Context> {
    #[must_use]
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, e: figment::Error) -> Report<T> {
        let mut this = self;
        for error in e {
            this = this.attach_printable(error.kind.to_string());

            if let (Some(profile), Some(md)) = (&error.profile, &error.metadata) {
                if !error.path.is_empty() {
                    let key = md.interpolate(profile, &error.path);
                    this = this.attach_printable(format!("for key {key:?}"));
                }
            }

            if let Some(md) = &error.metadata {
                if let Some(source) = &md.source {
                    this = this.attach_printable(format!("in {source} {}", md.name));
                } else {
                    this = this.attach_printable(format!("in {}", md.name));
                }
            }
        }
        this
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{providers::Serialized, Figment};
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("Failed to load")]
    struct Dummy;

    #[test]
    fn attaches_every_figment_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Config {
            port: u16,
        }

        let error = Figment::from(Serialized::defaults(serde_json::json!({ "port": "nope" })))
            .extract::<Config>()
            .map(|_| ())
            .map_err(|e| Report::new(Dummy).attach_figment_error(e));

        let Err(report) = error else {
            panic!("extracting an invalid port should fail");
        };
        let rendered = format!("{report:?}");
        assert!(rendered.contains("invalid type"));
        assert!(rendered.contains("port"));
    }
}
