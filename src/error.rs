use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatuslineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("field '{name}' not found in registry")]
    FieldNotFound { name: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatuslineError>;
