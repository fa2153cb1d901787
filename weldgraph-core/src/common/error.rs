use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown {entity} reference: {id}")]
    UnknownReference { entity: &'static str, id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
