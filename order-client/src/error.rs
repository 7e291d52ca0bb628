use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Error body returned by the API (`{error, details?}`).
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid order draft: {0}")]
    Draft(#[from] DraftError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("a client must be selected")]
    MissingClient,

    #[error("{field} is not a valid amount: '{value}'")]
    InvalidAmount { field: String, value: String },

    #[error("{field} must not be negative")]
    NegativeAmount { field: String },
}
