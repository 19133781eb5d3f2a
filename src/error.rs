use thiserror::Error;

/// Rejected level or tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid level field `{field}`: {reason}")]
    InvalidLevel { field: String, reason: String },

    #[error("invalid tuning field `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    #[error("no built-in level with id {0}")]
    UnknownLevel(u32),
}
