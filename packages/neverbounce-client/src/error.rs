use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeverBounceError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("verification rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, NeverBounceError>;
