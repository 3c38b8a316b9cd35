use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Unknown station handle: {0}")]
    UnknownStation(usize),
    #[error("Unknown receiver handle: {0}")]
    UnknownReceiver(usize),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;
