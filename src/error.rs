use thiserror::Error;

/// Main error type for the stream planner service
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Errors raised while loading a capability catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid two-way pair: {0:?}")]
    InvalidTwoWayPair(String),

    #[error("Translation target entry without a target language")]
    EmptyTarget,

    #[error("Invalid language code in catalog: {0:?}")]
    InvalidLanguageCode(String),
}

/// Errors raised by the strict subscription parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Unknown subscription kind: {0:?}")]
    UnknownKind(String),

    #[error("Malformed language code in subscription: {0:?}")]
    MalformedLanguage(String),

    #[error("Translation subscription without a separator: {0:?}")]
    MissingSeparator(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlannerError>;
