//! Nemesis Constraint Kernel
//!
//! Satisfiability checking for conjunctions of linear constraints over
//! real-valued (Decimal) variables. Both reasoning engines build a fresh
//! [`Model`] per call - there is no shared solver instance, so constraints
//! can never leak between unrelated invocations.
//!
//! The decision procedure is Gaussian substitution for equalities plus
//! Fourier-Motzkin elimination for inequalities. The fragment is decidable,
//! so every well-budgeted `check` returns Sat or Unsat.

mod expr;
mod model;

pub use expr::{LinExpr, Var};
pub use model::{Model, SatResult, SolverError};
