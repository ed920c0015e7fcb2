use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Event generator request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Event generator payload rejected: {reason}")]
    InvalidPayload { reason: String },

    #[error("Unknown catalog action '{id}'")]
    UnknownAction { id: String },

    #[error("Invalid founder allocation: {reason}")]
    InvalidFounder { reason: String },

    #[error("A month is already being advanced")]
    TickInProgress,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
