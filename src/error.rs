use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker produced no result within {0:?}")]
    WorkerTimeout(Duration),

    #[error("worker failed: {0}")]
    WorkerFailed(String),

    #[error("worker cancelled")]
    WorkerCancelled,
}

impl From<ureq::Error> for PipelineError {
    fn from(err: ureq::Error) -> Self {
        PipelineError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
