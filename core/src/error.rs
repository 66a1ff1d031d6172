use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Write rejected for {entity} '{id}'")]
    WriteRejected { entity: &'static str, id: String },

    #[error("Invalid stored value in column '{column}': {value}")]
    InvalidData { column: &'static str, value: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
