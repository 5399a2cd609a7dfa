use nemesis_constraint::{LinExpr, Model, SatResult};
use nemesis_core::Price;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, Result};

/// Drop used when no magnet level is reachable within the realism bound
const FALLBACK_DROP_FRACTION: Decimal = dec!(0.05);

/// How the planner arrived at its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPrecision {
    /// Minimal feasible displacement onto a magnet level
    Exact,
    /// No magnet level was reachable; fixed 5% fallback
    Fallback,
    /// Policy override: target forced deeper so the crash is visually
    /// unambiguous
    ForcedVisibility,
}

/// Output of the crash planner: the displacement to inflict and the price it
/// lands on. Immutable once computed; consumed by the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashTarget {
    /// Downward displacement, strictly positive
    pub displacement: Decimal,
    /// `current_price - displacement`
    pub target_price: Decimal,
    pub precision: TargetPrecision,
}

/// Finds the minimal downward displacement that lands on a liquidity-magnet
/// level (a price divisible by the configured granularity), subject to a
/// maximum realistic drop for a single interval.
///
/// Stop-loss orders cluster at round numbers, so the nearest magnet level
/// below the current price is the cheapest point to trigger a cascade.
/// Deterministic: no randomness, same input gives same target.
#[derive(Debug, Clone)]
pub struct CrashPlanner {
    /// Realism bound: never more than this fraction in one interval
    pub max_drop_fraction: Decimal,
    /// Magnet spacing; 100 suits BTC-scale prices, 10 suits ETH-scale
    pub magnet_granularity: Decimal,
}

impl Default for CrashPlanner {
    fn default() -> Self {
        Self {
            max_drop_fraction: dec!(0.10),
            magnet_granularity: dec!(100),
        }
    }
}

impl CrashPlanner {
    pub fn new(max_drop_fraction: Decimal, magnet_granularity: Decimal) -> Self {
        Self {
            max_drop_fraction,
            magnet_granularity,
        }
    }

    /// Compute the crash target for an attack starting at `current_price`.
    ///
    /// Magnet levels are scanned shallowest-first, and each candidate is
    /// checked for feasibility as a constraint model, so the first
    /// satisfiable level minimizes the displacement. The drop bound lives in
    /// the model, not the scan: a level outside it is refuted, not skipped.
    /// When every level is refuted (tight bounds or pathological
    /// granularities), the planner degrades to a fixed 5% drop with a
    /// distinguishable [`TargetPrecision::Fallback`] marker.
    pub fn find_minimal_crash(&self, current_price: Price) -> Result<CrashTarget> {
        if current_price <= Decimal::ZERO {
            return Err(ChaosError::NonPositivePrice(current_price));
        }
        if self.magnet_granularity <= Decimal::ZERO {
            return Ok(self.fallback(current_price));
        }

        let granularity = self.magnet_granularity;

        // Largest magnet level strictly below the current price
        let mut level = (current_price / granularity).floor() * granularity;
        if level >= current_price {
            level -= granularity;
        }

        while level > Decimal::ZERO {
            if self.level_is_feasible(current_price, level)? == SatResult::Sat {
                let displacement = current_price - level;
                log::debug!(
                    "crash target solved: {current_price} -> {level} (displacement {displacement})"
                );
                return Ok(CrashTarget {
                    displacement,
                    target_price: level,
                    precision: TargetPrecision::Exact,
                });
            }
            level -= granularity;
        }

        Ok(self.fallback(current_price))
    }

    /// Feasibility of one candidate magnet level:
    /// `d > 0`, `d <= price * max_drop_fraction`, `price - d == level`.
    fn level_is_feasible(&self, current_price: Price, level: Decimal) -> Result<SatResult> {
        let mut model = Model::new();
        let d = model.real("d");
        let target = model.real("target_price");

        model.assert_eq(target, LinExpr::constant(current_price) - LinExpr::from(d));
        model.assert_gt(d, LinExpr::constant(Decimal::ZERO));
        model.assert_le(
            d,
            LinExpr::constant(current_price * self.max_drop_fraction),
        );
        model.assert_eq(target, LinExpr::constant(level));

        Ok(model.check()?)
    }

    fn fallback(&self, current_price: Price) -> CrashTarget {
        let displacement = current_price * FALLBACK_DROP_FRACTION;
        log::warn!(
            "no magnet level reachable within {} of {current_price}; falling back to fixed 5% drop",
            self.max_drop_fraction
        );
        CrashTarget {
            displacement,
            target_price: current_price - displacement,
            precision: TargetPrecision::Fallback,
        }
    }
}
