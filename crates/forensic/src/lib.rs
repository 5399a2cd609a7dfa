//! Nemesis Forensic Engine
//!
//! Post-mortem verification of recorded trade executions:
//!
//! - **Fair-execution verifier**: builds a satisfiability model of the
//!   fair-market invariant and rules each execution `CLEAN` or
//!   `LIQUIDITY_VOID_DETECTED`
//! - **Evidence ingestion**: normalizes heterogeneous trade-log CSVs into
//!   the canonical evidence format
//! - **Case reports**: renders a human-readable verdict artifact
//!
//! A solver failure is a hard error, never a default verdict: silently
//! returning `CLEAN` would corrupt the guarantee this crate exists to give.

mod error;
mod evidence;
mod report;
mod verifier;

pub use error::{ForensicError, Result};
pub use evidence::EvidenceLog;
pub use report::CaseReport;
pub use verifier::FairExecutionVerifier;
