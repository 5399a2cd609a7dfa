use nemesis_constraint::SolverError;
use nemesis_core::CandleError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChaosError {
    #[error("invalid interval: {0}")]
    InvalidInterval(#[from] CandleError),

    #[error("non-positive price: {0}")]
    NonPositivePrice(Decimal),

    #[error("sampled value not representable as decimal: {0}")]
    NumericRange(f64),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type Result<T> = std::result::Result<T, ChaosError>;
