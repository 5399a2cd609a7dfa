//! Nemesis Core Domain
//!
//! Pure domain types for the Nemesis adversarial-market system.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    BookLevel, Candle, CandleError, OrderBookSnapshot, Ruling, Side, SideParseError, Trade,
    Verdict,
};
pub use values::{Price, Quantity, Symbol, Timestamp};
