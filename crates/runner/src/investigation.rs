use nemesis_forensic::{CaseReport, EvidenceLog, FairExecutionVerifier, ForensicError};
use std::path::Path;

use crate::context::MarketContext;
use crate::error::Result;

/// Window pulled around the death trade, matching the exchange's aggTrades
/// granularity: five seconds before, one after
const WINDOW_BEFORE_MS: i64 = 5_000;
const WINDOW_AFTER_MS: i64 = 1_000;

/// Book depth requested for the liquidity snapshot
const BOOK_DEPTH: usize = 100;

/// Runs a complete post-mortem: evidence file in, case report out.
///
/// The delegator owns no reasoning of its own - it sequences evidence
/// normalization, context retrieval and the fair-execution verifier, and
/// propagates every failure as-is. In particular a solver failure surfaces
/// as an error; no verdict is fabricated.
pub struct InvestigationDelegator<C: MarketContext> {
    context: C,
    verifier: FairExecutionVerifier,
}

impl<C: MarketContext> InvestigationDelegator<C> {
    pub fn new(context: C) -> Self {
        Self {
            context,
            verifier: FairExecutionVerifier::default(),
        }
    }

    pub fn with_verifier(context: C, verifier: FairExecutionVerifier) -> Self {
        Self { context, verifier }
    }

    pub fn run(&self, evidence_path: impl AsRef<Path>) -> Result<CaseReport> {
        let evidence_path = evidence_path.as_ref();
        log::info!("starting investigation on {}", evidence_path.display());

        let evidence = EvidenceLog::from_csv_path(evidence_path)?;
        let death_trade = evidence
            .death_trade()
            .ok_or(ForensicError::EmptyEvidence)?
            .clone();

        let anchor_ms = death_trade.timestamp_ms();
        let history = self.context.historical_trades(
            &death_trade.symbol,
            anchor_ms - WINDOW_BEFORE_MS,
            anchor_ms + WINDOW_AFTER_MS,
        )?;
        let book = self.context.orderbook(&death_trade.symbol, BOOK_DEPTH)?;

        let verdict = self.verifier.verify(&death_trade, &history, &book)?;
        log::info!(
            "investigation ruling for {} @ {}: {}",
            death_trade.symbol,
            death_trade.price,
            verdict.ruling
        );

        Ok(CaseReport::new(death_trade, verdict, history))
    }
}
