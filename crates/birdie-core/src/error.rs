use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Release time already passed ({0})")]
    ReleasePassed(String),

    #[error("Failed to write run artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize run summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
