use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::Symbol;

/// A recorded trade execution, as reconstructed from evidence.
///
/// The "death trade" of an evidence sequence is, by convention, the last
/// trade in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
}

impl Trade {
    pub fn new(
        timestamp: DateTime<Utc>,
        symbol: impl Into<Symbol>,
        side: Side,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            side,
            price,
            qty,
        }
    }

    /// Arrival timestamp in unix milliseconds
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Returns the notional value of the trade (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price * self.qty
    }
}
