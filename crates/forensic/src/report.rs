use chrono::{DateTime, Utc};
use nemesis_core::{Trade, Verdict};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;

/// Human-readable verdict artifact for one investigation.
///
/// Consumes the verdict plus the historical trade window; rendering is a
/// pure string build, persistence is the caller's choice.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub case_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub death_trade: Trade,
    pub verdict: Verdict,
    pub history: Vec<Trade>,
}

impl CaseReport {
    pub fn new(death_trade: Trade, verdict: Verdict, history: Vec<Trade>) -> Self {
        Self {
            case_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            death_trade,
            verdict,
            history,
        }
    }

    /// Render the report as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "NEMESIS FORENSIC REPORT");
        let _ = writeln!(out, "Case:      CASE-{}", self.case_id);
        let _ = writeln!(out, "Generated: {}", self.generated_at.to_rfc3339());
        let _ = writeln!(out);
        let _ = writeln!(out, "Death trade");
        let _ = writeln!(out, "  symbol:    {}", self.death_trade.symbol);
        let _ = writeln!(out, "  side:      {:?}", self.death_trade.side);
        let _ = writeln!(out, "  price:     {}", self.death_trade.price);
        let _ = writeln!(out, "  qty:       {}", self.death_trade.qty);
        let _ = writeln!(
            out,
            "  executed:  {}",
            self.death_trade.timestamp.to_rfc3339()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Ruling: {}", self.verdict.ruling);
        let _ = writeln!(out, "  {}", self.verdict.details);
        let _ = writeln!(out);
        let _ = writeln!(out, "Context window: {} trades", self.history.len());
        if let (Some(first), Some(last)) = (self.history.first(), self.history.last()) {
            let low = self.history.iter().map(|t| t.price).min();
            let high = self.history.iter().map(|t| t.price).max();
            let _ = writeln!(
                out,
                "  span:   {} .. {}",
                first.timestamp.to_rfc3339(),
                last.timestamp.to_rfc3339()
            );
            if let (Some(low), Some(high)) = (low, high) {
                let _ = writeln!(out, "  prices: {low} .. {high}");
            }
        }
        out
    }

    /// Write the rendered report to `dir/CASE-{id}.txt`
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("CASE-{}.txt", self.case_id));
        fs::write(&path, self.render())?;
        log::info!("report written to {}", path.display());
        Ok(path)
    }
}
