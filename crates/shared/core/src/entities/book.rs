use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order book level (price + quantity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl BookLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// A point-in-time snapshot of resting liquidity.
///
/// Uses BTreeMap for price levels to maintain sorted order: best bid is the
/// highest bid price, best ask is the lowest ask price. Zero-quantity levels
/// are dropped on construction.
///
/// A snapshot does not guarantee a non-negative spread; consumers that rely
/// on book sanity must check for a crossed book themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Bid levels: price -> quantity
    bids: BTreeMap<Decimal, Decimal>,
    /// Ask levels: price -> quantity
    asks: BTreeMap<Decimal, Decimal>,
}

impl OrderBookSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from unordered level lists (feed order varies by venue)
    pub fn from_levels(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        let mut snapshot = Self::new();
        for level in bids {
            if !level.quantity.is_zero() {
                snapshot.bids.insert(level.price, level.quantity);
            }
        }
        for level in asks {
            if !level.quantity.is_zero() {
                snapshot.asks.insert(level.price, level.quantity);
            }
        }
        snapshot
    }

    /// Get best bid price and quantity
    pub fn best_bid(&self) -> Option<(Decimal, Decimal)> {
        self.bids.iter().next_back().map(|(p, q)| (*p, *q))
    }

    /// Get best ask price and quantity
    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.asks.iter().next().map(|(p, q)| (*p, *q))
    }

    /// Get spread (ask - bid); negative for a crossed book
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get mid price (average of best bid and ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Check if book has both sides
    pub fn is_two_sided(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty()
    }

    /// Top N bid levels (highest prices first)
    pub fn top_bids(&self, n: usize) -> Vec<BookLevel> {
        self.bids
            .iter()
            .rev()
            .take(n)
            .map(|(p, q)| BookLevel::new(*p, *q))
            .collect()
    }

    /// Top N ask levels (lowest prices first)
    pub fn top_asks(&self, n: usize) -> Vec<BookLevel> {
        self.asks
            .iter()
            .take(n)
            .map(|(p, q)| BookLevel::new(*p, *q))
            .collect()
    }
}
