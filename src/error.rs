use thiserror::Error;

#[derive(Error, Debug)]
pub enum CibotError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Access denied: {0}")]
    Authorization(String),

    #[error("CI server returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CibotError>;
