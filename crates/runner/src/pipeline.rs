use nemesis_chaos::{CrashTarget, FlashCrashSynthesizer};
use nemesis_core::Candle;

use crate::error::Result;

/// How a batch of candles should be handled.
///
/// The mode is an explicit per-call parameter, not a process-wide flag:
/// concurrent sessions running in different modes cannot race each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Relay the feed untouched
    Transparent,
    /// Rewrite the most recent interval into an engineered crash
    Adversarial,
}

/// A processed candle batch, with the crash target when one was injected
#[derive(Debug, Clone)]
pub struct ProcessedBatch {
    pub candles: Vec<Candle>,
    pub injection: Option<CrashTarget>,
}

/// Routes candle batches from the upstream feed adapter, poisoning the last
/// interval of a batch when the session runs adversarially. The shape of the
/// batch is preserved either way, so downstream relays need no special case.
pub struct FeedPipeline {
    synthesizer: FlashCrashSynthesizer,
}

impl FeedPipeline {
    pub fn new(synthesizer: FlashCrashSynthesizer) -> Self {
        Self { synthesizer }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(FlashCrashSynthesizer::with_seed(seed))
    }

    pub fn process(&mut self, mode: SessionMode, candles: &[Candle]) -> Result<ProcessedBatch> {
        let mut candles = candles.to_vec();

        let injection = if mode == SessionMode::Adversarial && !candles.is_empty() {
            let last = candles.len() - 1;
            let injection = self.synthesizer.inject_crash(&candles[last])?;
            candles[last] = injection.candle;
            Some(injection.target)
        } else {
            None
        };

        Ok(ProcessedBatch { candles, injection })
    }
}
