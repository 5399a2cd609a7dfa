use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single OHLCV interval from an exchange feed.
///
/// Candles are value objects: rewriting engines return a fresh candle rather
/// than mutating a shared one, so a caller that retained the original for
/// broadcast never observes a half-rewritten interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CandleError {
    #[error("non-positive price field: {0}")]
    NonPositivePrice(&'static str),

    #[error("negative volume")]
    NegativeVolume,

    #[error("broken price ordering: {0}")]
    BrokenOrdering(&'static str),
}

impl Candle {
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Validates the structural invariants of a well-formed interval:
    /// all prices strictly positive, volume non-negative, and
    /// `low <= {open, close} <= high`.
    pub fn validate(&self) -> Result<(), CandleError> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if value <= Decimal::ZERO {
                return Err(CandleError::NonPositivePrice(name));
            }
        }
        if self.volume < Decimal::ZERO {
            return Err(CandleError::NegativeVolume);
        }
        if self.low > self.open || self.open > self.high {
            return Err(CandleError::BrokenOrdering("low <= open <= high"));
        }
        if self.low > self.close || self.close > self.high {
            return Err(CandleError::BrokenOrdering("low <= close <= high"));
        }
        Ok(())
    }

    /// Candle range (high - low)
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// True if the interval closed below its open
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
