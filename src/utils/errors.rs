use thiserror::Error;

/// Main error type for tempfiles
#[derive(Error, Debug)]
pub enum TempfilesError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    BadUrl(String),

    #[error("UI error: {0}")]
    UIError(String),
}
