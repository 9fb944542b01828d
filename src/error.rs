/// Error returned by a [`Formatter`](crate::formatter::Formatter) that
/// cannot encode a record.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("field {key:?} has unsupported value kind {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("field {key:?} holds a non-finite float")]
    NonFiniteFloat { key: String },

    #[error("field {key:?} collides with a reserved key")]
    ReservedKey { key: String },

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type returned when parsing configuration strings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log level {0:?}")]
    UnknownLevel(String),

    #[error("unknown log format {0:?}")]
    UnknownFormat(String),

    #[error("key {0:?} is used more than once in the log line layout")]
    DuplicateKey(String),
}
