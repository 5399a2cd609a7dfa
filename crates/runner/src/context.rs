use nemesis_core::{OrderBookSnapshot, Trade};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, RunnerError};

/// Port to the historical-market collaborator (the "time machine").
///
/// The verifier needs a trade window and a book snapshot around the death
/// trade; where they come from is not the core's concern. Implementations
/// must report retrieval failure as an error rather than fabricating an
/// empty context.
pub trait MarketContext {
    /// Trades for `symbol` within `[start_ms, end_ms]`, in arrival order
    fn historical_trades(&self, symbol: &str, start_ms: i64, end_ms: i64) -> Result<Vec<Trade>>;

    /// Resting liquidity for `symbol`, truncated to `depth` levels per side
    fn orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot>;
}

/// A market context replayed from a recorded snapshot file.
///
/// Format: one JSON document with the symbol, the trade tape and the book.
/// This keeps investigations reproducible and the CLI free of network I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedContext {
    pub symbol: String,
    pub trades: Vec<Trade>,
    pub book: OrderBookSnapshot,
}

impl RecordedContext {
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn check_symbol(&self, symbol: &str) -> Result<()> {
        if self.symbol.eq_ignore_ascii_case(symbol) {
            Ok(())
        } else {
            Err(RunnerError::Context(format!(
                "no recording for {symbol} (snapshot covers {})",
                self.symbol
            )))
        }
    }
}

impl MarketContext for RecordedContext {
    fn historical_trades(&self, symbol: &str, start_ms: i64, end_ms: i64) -> Result<Vec<Trade>> {
        self.check_symbol(symbol)?;
        Ok(self
            .trades
            .iter()
            .filter(|t| (start_ms..=end_ms).contains(&t.timestamp_ms()))
            .cloned()
            .collect())
    }

    fn orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot> {
        self.check_symbol(symbol)?;
        Ok(OrderBookSnapshot::from_levels(
            self.book.top_bids(depth),
            self.book.top_asks(depth),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nemesis_core::{BookLevel, Side};
    use rust_decimal_macros::dec;

    fn sample_context() -> RecordedContext {
        let at = |ms: i64| Utc.timestamp_millis_opt(ms).unwrap();
        RecordedContext {
            symbol: "BTCUSDT".to_string(),
            trades: vec![
                Trade::new(at(1_000), "BTCUSDT", Side::Buy, dec!(95000), dec!(1)),
                Trade::new(at(5_000), "BTCUSDT", Side::Sell, dec!(94990), dec!(1)),
                Trade::new(at(9_000), "BTCUSDT", Side::Buy, dec!(95010), dec!(1)),
            ],
            book: OrderBookSnapshot::from_levels(
                vec![BookLevel::new(dec!(94990), dec!(2))],
                vec![BookLevel::new(dec!(95000), dec!(2))],
            ),
        }
    }

    #[test]
    fn test_window_filtering() {
        let context = sample_context();
        let window = context.historical_trades("BTCUSDT", 2_000, 8_000).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].price, dec!(94990));
    }

    #[test]
    fn test_symbol_mismatch_is_an_error() {
        let context = sample_context();
        assert!(matches!(
            context.orderbook("ETHUSDT", 10),
            Err(RunnerError::Context(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let context = sample_context();
        let raw = serde_json::to_string(&context).unwrap();
        let parsed: RecordedContext = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.trades.len(), 3);
        assert_eq!(parsed.book.best_ask(), Some((dec!(95000), dec!(2))));
    }
}
