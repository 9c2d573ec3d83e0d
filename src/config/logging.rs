use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Pretty,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    /// **Environment variables**:
    /// - `PICTOGRAM_LOGGING_STYLE`
    #[serde(default)]
    pub style: LoggingStyle,
    /// Default logging directives if `RUST_LOG` is not set.
    ///
    /// **Environment variables**:
    /// - `PICTOGRAM_LOGGING_TARGETS`
    #[serde(default = "Logging::default_targets")]
    pub targets: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            style: LoggingStyle::default(),
            targets: Self::default_targets(),
        }
    }
}

impl Logging {
    fn default_targets() -> String {
        "info".into()
    }
}
