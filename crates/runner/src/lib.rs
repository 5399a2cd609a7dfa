//! Nemesis Runner
//!
//! Orchestrates the two reasoning engines without owning any of their logic:
//!
//! - **Pipeline**: routes candle batches through the synthesizer, with the
//!   attack/passthrough decision made per call instead of via process-wide
//!   state
//! - **Investigation**: wires evidence ingestion, historical-context
//!   retrieval and the fair-execution verifier into one post-mortem flow
//! - **Recorder**: append-only JSONL session telemetry
//!
//! Historical context comes through the [`MarketContext`] port; the shipped
//! implementation replays a recorded snapshot, keeping the upstream exchange
//! API out of the core.

mod context;
mod error;
mod investigation;
mod pipeline;
mod recorder;

pub use context::{MarketContext, RecordedContext};
pub use error::{Result, RunnerError};
pub use investigation::InvestigationDelegator;
pub use pipeline::{FeedPipeline, ProcessedBatch, SessionMode};
pub use recorder::{BlackBox, SessionEvent};
