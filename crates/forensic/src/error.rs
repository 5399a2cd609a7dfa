use nemesis_constraint::SolverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForensicError {
    /// Present but malformed book: distinct from "context unavailable",
    /// which upstream retrieval reports before the verifier runs
    #[error("malformed order book: {0}")]
    MalformedBook(String),

    #[error("evidence error: {0}")]
    Evidence(String),

    #[error("evidence file contains no trades")]
    EmptyEvidence,

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ForensicError>;
