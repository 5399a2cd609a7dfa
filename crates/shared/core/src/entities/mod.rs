mod book;
mod candle;
mod side;
mod trade;
mod verdict;

pub use book::{BookLevel, OrderBookSnapshot};
pub use candle::{Candle, CandleError};
pub use side::{Side, SideParseError};
pub use trade::Trade;
pub use verdict::{Ruling, Verdict};
