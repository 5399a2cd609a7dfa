use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Trade side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized trade side: {0}")]
pub struct SideParseError(pub String);

impl FromStr for Side {
    type Err = SideParseError;

    /// Parses the side labels found in exchange trade logs.
    /// Case-insensitive; accepts BUY/SELL and the BID/ASK aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "BID" | "B" => Ok(Side::Buy),
            "SELL" | "ASK" | "S" => Ok(Side::Sell),
            other => Err(SideParseError(other.to_string())),
        }
    }
}
