//! Nemesis Chaos Engine
//!
//! Synthesizes adversarially engineered price collapses inside a single
//! OHLCV interval:
//!
//! - **Crash planner**: constraint optimization that finds the shallowest
//!   drop landing on a liquidity-magnet level ("sniper, not sledgehammer")
//! - **Jump-diffusion model**: stochastic coloring for the collapse path
//! - **Flash-crash synthesizer**: rewrites an interval into a stop-hunt,
//!   collapse and dead-cat bounce, pinned to the planned target
//!
//! Every call is pure modulo the injected, seedable random source.

mod diffusion;
mod error;
mod planner;
mod synthesizer;

pub use diffusion::{JumpDiffusion, JumpPath};
pub use error::{ChaosError, Result};
pub use planner::{CrashPlanner, CrashTarget, TargetPrecision};
pub use synthesizer::{CrashInjection, FlashCrashSynthesizer};
