use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Validation failures raised by the pure domain rules in this crate.
///
/// The `Display` text of the URL and bulk variants is user-facing: the server
/// returns it verbatim as the response `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid sort mode \"{0}\": expected \"asc\" or \"desc\"")]
    InvalidSortMode(String),
    #[error("{0}")]
    InvalidPostUrl(String),
    #[error("{0}")]
    BulkFormat(String),
}
