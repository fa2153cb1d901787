use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl From<weldgraph_core::common::error::CoreError> for ResolverError {
    fn from(err: weldgraph_core::common::error::CoreError) -> Self {
        ResolverError::Storage {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
