use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use nemesis_core::{Side, Trade};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ForensicError, Result};

// Column aliases seen across exchange trade-log exports
const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "time", "date"];
const SYMBOL_ALIASES: &[&str] = &["symbol", "pair"];
const SIDE_ALIASES: &[&str] = &["side", "type"];
const PRICE_ALIASES: &[&str] = &["price", "avg_price", "exec_price"];
const QTY_ALIASES: &[&str] = &["qty", "amount", "size"];

/// A normalized evidence sequence: heterogeneous trade-log CSVs reduced to
/// the canonical trade format, preserved in arrival order.
#[derive(Debug, Clone)]
pub struct EvidenceLog {
    trades: Vec<Trade>,
}

impl EvidenceLog {
    /// Load and normalize a trade-log CSV from disk
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_csv_str(&raw)
    }

    /// Normalize CSV content: sniff the delimiter, map column aliases onto
    /// the canonical schema, detect the timestamp unit per row.
    pub fn from_csv_str(raw: &str) -> Result<Self> {
        let delimiter = sniff_delimiter(raw);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let find = |aliases: &[&str]| -> Option<usize> {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias))
        };

        let columns = [
            ("timestamp", find(TIMESTAMP_ALIASES)),
            ("symbol", find(SYMBOL_ALIASES)),
            ("side", find(SIDE_ALIASES)),
            ("price", find(PRICE_ALIASES)),
            ("qty", find(QTY_ALIASES)),
        ];
        let missing: Vec<&str> = columns
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ForensicError::Evidence(format!(
                "CSV format invalid, missing columns {missing:?} (found {headers:?})"
            )));
        }
        let [ts_col, symbol_col, side_col, price_col, qty_col] =
            columns.map(|(_, idx)| idx.unwrap_or_default());

        let mut trades = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |idx: usize| -> Result<&str> {
                record.get(idx).ok_or_else(|| {
                    ForensicError::Evidence(format!("short record at line {}", trades.len() + 2))
                })
            };

            let timestamp = parse_timestamp(field(ts_col)?)?;
            let symbol = field(symbol_col)?.to_ascii_uppercase();
            let side = Side::from_str(field(side_col)?)
                .map_err(|e| ForensicError::Evidence(e.to_string()))?;
            let price = parse_decimal(field(price_col)?, "price")?;
            let qty = parse_decimal(field(qty_col)?, "qty")?;

            trades.push(Trade::new(timestamp, symbol, side, price, qty));
        }

        log::info!("normalized {} evidence trades", trades.len());
        Ok(Self { trades })
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// The "death trade": last trade of the sequence in arrival order
    pub fn death_trade(&self) -> Option<&Trade> {
        self.trades.last()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// Guess the delimiter from the header line. Exports disagree; commas,
/// semicolons and tabs all occur in the wild.
fn sniff_delimiter(raw: &str) -> u8 {
    let header = raw.lines().next().unwrap_or_default();
    [b';', b'\t', b',']
        .into_iter()
        .max_by_key(|d| header.bytes().filter(|b| b == d).count())
        .unwrap_or(b',')
}

fn parse_decimal(raw: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|_| ForensicError::Evidence(format!("unparseable {column}: {raw:?}")))
}

/// Accepts epoch integers (unit detected by magnitude), RFC 3339, and the
/// common space-separated datetime forms.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(epoch) = raw.parse::<i64>() {
        return epoch_to_datetime(epoch);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(ForensicError::Evidence(format!(
        "unparseable timestamp: {raw:?}"
    )))
}

/// Epoch unit detection: plausible trading timestamps are post-2001, which
/// separates seconds/millis/micros/nanos by magnitude alone.
fn epoch_to_datetime(epoch: i64) -> Result<DateTime<Utc>> {
    let parsed = if epoch >= 100_000_000_000_000_000 {
        Some(DateTime::from_timestamp_nanos(epoch))
    } else if epoch >= 100_000_000_000_000 {
        DateTime::from_timestamp_micros(epoch)
    } else if epoch >= 100_000_000_000 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    parsed.ok_or_else(|| ForensicError::Evidence(format!("epoch out of range: {epoch}")))
}
