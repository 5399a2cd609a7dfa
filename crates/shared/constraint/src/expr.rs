use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

/// A real-valued variable inside one [`crate::Model`].
///
/// Variables are only meaningful within the model that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Var(pub(crate) usize);

/// A linear expression: `sum(coeff_i * var_i) + constant`.
///
/// BTreeMap keeps term order deterministic, which keeps elimination order
/// (and therefore the whole decision procedure) deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct LinExpr {
    pub(crate) terms: BTreeMap<usize, Decimal>,
    pub(crate) constant: Decimal,
}

impl LinExpr {
    /// The zero expression
    pub fn zero() -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: Decimal::ZERO,
        }
    }

    /// A constant expression
    pub fn constant(value: Decimal) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    /// True if the expression has no variable terms left
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub(crate) fn coeff(&self, var: usize) -> Decimal {
        self.terms.get(&var).copied().unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn insert_term(&mut self, var: usize, coeff: Decimal) {
        let entry = self.terms.entry(var).or_insert(Decimal::ZERO);
        *entry += coeff;
        if entry.is_zero() {
            self.terms.remove(&var);
        }
    }

    /// Replace `var` with the expression `replacement` (used for Gaussian
    /// substitution of equalities).
    pub(crate) fn substitute(&mut self, var: usize, replacement: &LinExpr) {
        let Some(coeff) = self.terms.remove(&var) else {
            return;
        };
        self.constant += coeff * replacement.constant;
        for (&v, &c) in &replacement.terms {
            self.insert_term(v, coeff * c);
        }
    }

    pub(crate) fn scale(mut self, factor: Decimal) -> Self {
        self.constant *= factor;
        for coeff in self.terms.values_mut() {
            *coeff *= factor;
        }
        self.terms.retain(|_, c| !c.is_zero());
        self
    }
}

impl From<Var> for LinExpr {
    fn from(var: Var) -> Self {
        let mut expr = LinExpr::zero();
        expr.terms.insert(var.0, Decimal::ONE);
        expr
    }
}

impl From<Decimal> for LinExpr {
    fn from(value: Decimal) -> Self {
        LinExpr::constant(value)
    }
}

impl Add for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: LinExpr) -> LinExpr {
        self.constant += rhs.constant;
        for (v, c) in rhs.terms {
            self.insert_term(v, c);
        }
        self
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;

    fn sub(self, rhs: LinExpr) -> LinExpr {
        self + (-rhs)
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> LinExpr {
        self.scale(-Decimal::ONE)
    }
}

impl Mul<Decimal> for LinExpr {
    type Output = LinExpr;

    fn mul(self, rhs: Decimal) -> LinExpr {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_term_cancellation() {
        let x = Var(0);
        let expr = LinExpr::from(x) - LinExpr::from(x) + LinExpr::constant(dec!(3));
        assert!(expr.is_constant());
        assert_eq!(expr.constant, dec!(3));
    }

    #[test]
    fn test_substitution() {
        // 2x + y + 1, with x := y - 4  =>  3y - 7
        let (x, y) = (Var(0), Var(1));
        let mut expr =
            LinExpr::from(x) * dec!(2) + LinExpr::from(y) + LinExpr::constant(Decimal::ONE);
        let replacement = LinExpr::from(y) - LinExpr::constant(dec!(4));
        expr.substitute(x.0, &replacement);

        assert_eq!(expr.coeff(y.0), dec!(3));
        assert_eq!(expr.constant, dec!(-7));
    }
}
