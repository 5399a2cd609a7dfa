use serde::{Deserialize, Serialize};
use std::fmt;

/// The ruling of a fair-execution verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruling {
    /// Execution explicable by visible liquidity
    Clean,
    /// Execution impossible given resting liquidity and allowed slippage
    LiquidityVoidDetected,
}

impl fmt::Display for Ruling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ruling::Clean => write!(f, "CLEAN"),
            Ruling::LiquidityVoidDetected => write!(f, "LIQUIDITY_VOID_DETECTED"),
        }
    }
}

/// Outcome of one verification call. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub ruling: Ruling,
    /// Free-text justification with the concrete facts interpolated
    pub details: String,
}

impl Verdict {
    pub fn new(ruling: Ruling, details: impl Into<String>) -> Self {
        Self {
            ruling,
            details: details.into(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.ruling == Ruling::Clean
    }
}
