use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// A uniqueness or foreign-key constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DatabaseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DatabaseError::Decode(err.to_string())
        } else {
            DatabaseError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Decode(err.to_string())
    }
}
