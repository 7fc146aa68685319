//! Form-state store error types.

/// Errors that can occur when loading or saving persisted form state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the state file failed
    #[error("state file error: {message}")]
    Io { message: String },

    /// The state file is not a JSON object of strings
    #[error("invalid state file: {message}")]
    Json { message: String },
}
