use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Duplicate filter key: {0}")]
    DuplicateKey(String),

    #[error("Duplicate query parameter: {0}")]
    DuplicateParam(String),

    #[error("Duplicate option value '{value}' in filter '{key}'")]
    DuplicateOption { key: String, value: String },

    #[error("Child parameter '{param}' of filter '{key}' collides with a top-level parameter")]
    ChildParamCollision { key: String, param: String },

    #[error("Trigger value '{trigger}' of filter '{key}' is not one of its options")]
    UnknownTrigger { key: String, trigger: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
