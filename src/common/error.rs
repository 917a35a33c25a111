use thiserror::Error;

/// Failures surfaced by the client. Persistence errors are logged by the
/// callers that treat storage as best-effort.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    MissingProfile(String),

    #[error("User profile not found. Please create your portrait first.")]
    ProfileNotFound,

    #[error("Server responded with {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to decode response: {0}")]
    Parse(String),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Connection(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
