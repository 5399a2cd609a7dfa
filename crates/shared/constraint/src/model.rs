use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::expr::{LinExpr, Var};

/// Outcome of a satisfiability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatResult {
    /// Some assignment of the real variables satisfies every constraint
    Sat,
    /// The constraints are contradictory
    Unsat,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolverError {
    /// Elimination produced more derived constraints than the budget allows.
    /// Surfaced to the caller as a hard failure - a model that cannot be
    /// decided must never degrade into a default verdict.
    #[error("constraint budget exceeded: {constraints} derived constraints")]
    BudgetExceeded { constraints: usize },
}

/// Normalized constraint: `expr <rel> 0`
#[derive(Debug, Clone, PartialEq)]
struct Constraint {
    expr: LinExpr,
    rel: Relation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// expr == 0
    Eq,
    /// expr <= 0
    Le,
    /// expr < 0
    Lt,
}

/// Cap on derived constraints during elimination. Fourier-Motzkin is
/// worst-case exponential; the models built by the engines stay tiny, so
/// hitting this cap means the caller handed us something pathological.
const CONSTRAINT_BUDGET: usize = 4096;

/// A constraint model over real variables.
///
/// Build one per call: declare variables with [`Model::real`], assert
/// constraints, then [`Model::check`]. The model is a one-shot value - it is
/// never reused across unrelated queries.
#[derive(Debug, Clone, Default)]
pub struct Model {
    names: Vec<String>,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a fresh real variable
    pub fn real(&mut self, name: &str) -> Var {
        self.names.push(name.to_string());
        Var(self.names.len() - 1)
    }

    /// Assert `lhs == rhs`
    pub fn assert_eq(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.push(lhs.into() - rhs.into(), Relation::Eq);
    }

    /// Assert `lhs <= rhs`
    pub fn assert_le(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.push(lhs.into() - rhs.into(), Relation::Le);
    }

    /// Assert `lhs < rhs`
    pub fn assert_lt(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.push(lhs.into() - rhs.into(), Relation::Lt);
    }

    /// Assert `lhs >= rhs`
    pub fn assert_ge(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.push(rhs.into() - lhs.into(), Relation::Le);
    }

    /// Assert `lhs > rhs`
    pub fn assert_gt(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.push(rhs.into() - lhs.into(), Relation::Lt);
    }

    fn push(&mut self, expr: LinExpr, rel: Relation) {
        self.constraints.push(Constraint { expr, rel });
    }

    /// Decide satisfiability of the asserted conjunction.
    ///
    /// Equalities are eliminated by Gaussian substitution, remaining
    /// variables by Fourier-Motzkin. Deterministic: identical models always
    /// return identical results.
    pub fn check(&self) -> Result<SatResult, SolverError> {
        let mut work = self.constraints.clone();

        // Variables in declaration order; BTreeMap terms keep this stable.
        for var in 0..self.names.len() {
            if work.len() > CONSTRAINT_BUDGET {
                return Err(SolverError::BudgetExceeded {
                    constraints: work.len(),
                });
            }
            work = eliminate(work, var);
        }

        // Only constant constraints remain
        for constraint in &work {
            debug_assert!(constraint.expr.is_constant());
            let c = constraint.expr.constant;
            let holds = match constraint.rel {
                Relation::Eq => c.is_zero(),
                Relation::Le => c <= Decimal::ZERO,
                Relation::Lt => c < Decimal::ZERO,
            };
            if !holds {
                log::debug!("model {self} refuted by residual constraint {c} {:?} 0", constraint.rel);
                return Ok(SatResult::Unsat);
            }
        }
        Ok(SatResult::Sat)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {} constraints]",
            self.names.join(", "),
            self.constraints.len()
        )
    }
}

/// Remove `var` from the constraint set, preserving satisfiability of the
/// remaining variables.
fn eliminate(work: Vec<Constraint>, var: usize) -> Vec<Constraint> {
    // Prefer Gaussian substitution when an equality pins the variable
    if let Some(pos) = work
        .iter()
        .position(|c| c.rel == Relation::Eq && !c.expr.coeff(var).is_zero())
    {
        let pivot = work[pos].clone();
        let a = pivot.expr.coeff(var);
        // a*var + rest == 0  =>  var == -rest/a
        let mut rest = pivot.expr.clone();
        rest.insert_term(var, -a);
        let replacement = rest.scale(-Decimal::ONE / a);

        return work
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, mut c)| {
                c.expr.substitute(var, &replacement);
                c
            })
            .collect();
    }

    // Fourier-Motzkin: pair every lower bound with every upper bound
    let mut lowers: Vec<(LinExpr, bool)> = Vec::new(); // bound <= / < var
    let mut uppers: Vec<(LinExpr, bool)> = Vec::new(); // var <= / < bound
    let mut rest = Vec::new();

    for c in work {
        let a = c.expr.coeff(var);
        if a.is_zero() {
            rest.push(c);
            continue;
        }
        let strict = c.rel == Relation::Lt;
        // a*var + r rel 0  =>  var rel -r/a (inequality flips when a < 0)
        let mut r = c.expr;
        r.insert_term(var, -a);
        let bound = r.scale(-Decimal::ONE / a);
        if a > Decimal::ZERO {
            uppers.push((bound, strict));
        } else {
            lowers.push((bound, strict));
        }
    }

    for (lower, strict_l) in &lowers {
        for (upper, strict_u) in &uppers {
            let rel = if *strict_l || *strict_u {
                Relation::Lt
            } else {
                Relation::Le
            };
            rest.push(Constraint {
                expr: lower.clone() - upper.clone(),
                rel,
            });
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trivially_sat() {
        let model = Model::new();
        assert_eq!(model.check(), Ok(SatResult::Sat));
    }

    #[test]
    fn test_pinned_variable_within_bounds() {
        let mut model = Model::new();
        let x = model.real("x");
        model.assert_eq(x, LinExpr::constant(dec!(5)));
        model.assert_le(x, LinExpr::constant(dec!(10)));
        model.assert_ge(x, LinExpr::constant(dec!(1)));
        assert_eq!(model.check(), Ok(SatResult::Sat));
    }

    #[test]
    fn test_pinned_variable_outside_bounds() {
        let mut model = Model::new();
        let x = model.real("x");
        model.assert_eq(x, LinExpr::constant(dec!(50)));
        model.assert_le(x, LinExpr::constant(dec!(10)));
        assert_eq!(model.check(), Ok(SatResult::Unsat));
    }

    #[test]
    fn test_strict_bounds_unsat_on_empty_interval() {
        // x > 3 and x < 3 has no solution; x >= 3 and x <= 3 does
        let mut strict = Model::new();
        let x = strict.real("x");
        strict.assert_gt(x, LinExpr::constant(dec!(3)));
        strict.assert_lt(x, LinExpr::constant(dec!(3)));
        assert_eq!(strict.check(), Ok(SatResult::Unsat));

        let mut closed = Model::new();
        let y = closed.real("y");
        closed.assert_ge(y, LinExpr::constant(dec!(3)));
        closed.assert_le(y, LinExpr::constant(dec!(3)));
        assert_eq!(closed.check(), Ok(SatResult::Sat));
    }

    #[test]
    fn test_two_variable_chain() {
        // x == 100 - d, d > 0, d <= 10, x == 95  =>  d == 5, feasible
        let mut model = Model::new();
        let d = model.real("d");
        let x = model.real("x");
        model.assert_eq(x, LinExpr::constant(dec!(100)) - LinExpr::from(d));
        model.assert_gt(d, LinExpr::constant(Decimal::ZERO));
        model.assert_le(d, LinExpr::constant(dec!(10)));
        model.assert_eq(x, LinExpr::constant(dec!(95)));
        assert_eq!(model.check(), Ok(SatResult::Sat));
    }

    #[test]
    fn test_two_variable_chain_infeasible() {
        // x == 100 - d, d <= 10, x == 80  =>  d == 20, contradiction
        let mut model = Model::new();
        let d = model.real("d");
        let x = model.real("x");
        model.assert_eq(x, LinExpr::constant(dec!(100)) - LinExpr::from(d));
        model.assert_le(d, LinExpr::constant(dec!(10)));
        model.assert_eq(x, LinExpr::constant(dec!(80)));
        assert_eq!(model.check(), Ok(SatResult::Unsat));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        // |p - m| <= allowed with p exactly at m + allowed
        let mut model = Model::new();
        let p = model.real("p");
        let (m, allowed) = (dec!(95000), dec!(960));
        model.assert_eq(p, LinExpr::constant(m + allowed));
        model.assert_le(
            LinExpr::from(p) - LinExpr::constant(m),
            LinExpr::constant(allowed),
        );
        model.assert_le(
            LinExpr::constant(m) - LinExpr::from(p),
            LinExpr::constant(allowed),
        );
        assert_eq!(model.check(), Ok(SatResult::Sat));
    }

    #[test]
    fn test_budget_exceeded_is_a_hard_error() {
        let mut model = Model::new();
        let x = model.real("x");
        for i in 0..5000 {
            model.assert_le(x, LinExpr::constant(Decimal::from(i)));
        }
        assert_eq!(
            model.check(),
            Err(SolverError::BudgetExceeded { constraints: 5000 })
        );
    }

    #[test]
    fn test_check_is_deterministic() {
        let build = || {
            let mut model = Model::new();
            let x = model.real("x");
            let y = model.real("y");
            model.assert_le(LinExpr::from(x) + LinExpr::from(y), LinExpr::constant(dec!(1)));
            model.assert_ge(x, LinExpr::constant(dec!(0.25)));
            model.assert_ge(y, LinExpr::constant(dec!(0.25)));
            model
        };
        for _ in 0..10 {
            assert_eq!(build().check(), Ok(SatResult::Sat));
        }
    }
}
