use thiserror::Error;

/// A wiring bug in the code driving the form.
///
/// Validation failures are never reported this way; they live in the
/// form state as error descriptors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field `{0}` is a collection, not a single field")]
    NotAField(String),

    #[error("Field `{0}` is not a collection")]
    NotACollection(String),

    #[error("Index {index} out of range for collection `{collection}` of length {len}")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, UsageError>;

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
}
