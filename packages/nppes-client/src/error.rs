use thiserror::Error;

#[derive(Debug, Error)]
pub enum NppesError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned status {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, NppesError>;
