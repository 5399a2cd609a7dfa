use nemesis_chaos::ChaosError;
use nemesis_forensic::ForensicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("context retrieval failed: {0}")]
    Context(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Forensic(#[from] ForensicError),

    #[error(transparent)]
    Chaos(#[from] ChaosError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
