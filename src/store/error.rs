use thiserror::Error;

/// Failures crossing the persistence boundary.
/// Callers log these and fall back to defaults; none is fatal.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data under {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}
