use nemesis_core::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;

use crate::diffusion::JumpDiffusion;
use crate::error::{ChaosError, Result};
use crate::planner::{CrashPlanner, CrashTarget, TargetPrecision};

/// Targets above this fraction of the open are too subtle to read as a crash
const VISIBILITY_FLOOR_FRACTION: Decimal = dec!(0.95);
/// Forced drop applied when the planner's target fails the visibility floor
const FORCED_DROP_FRACTION: Decimal = dec!(0.08);

/// Stop-hunt excursion range (fraction above the open)
const STOP_HUNT_MIN: f64 = 0.001;
const STOP_HUNT_MAX: f64 = 0.005;
/// Dead-cat bounce range (fraction above the crash floor)
const REBOUND_MIN: f64 = 0.005;
const REBOUND_MAX: f64 = 0.015;
/// Panic volume multiplier range
const PANIC_VOLUME_MIN: f64 = 5.0;
const PANIC_VOLUME_MAX: f64 = 10.0;

/// Result of one injection: the rewritten interval plus the target that
/// pinned its floor.
#[derive(Debug, Clone)]
pub struct CrashInjection {
    pub candle: Candle,
    pub target: CrashTarget,
}

/// Rewrites a single OHLCV interval into an engineered flash crash: a brief
/// stop-hunt above the open, a collapse to the planned magnet level, and a
/// dead-cat bounce, with volume inflated to match a liquidation cascade.
///
/// The input candle is never mutated; a fresh candle is returned so callers
/// that retained the original for broadcast keep a consistent view. The RNG
/// is seeded at construction, so identical seeds replay identical attacks.
pub struct FlashCrashSynthesizer {
    planner: CrashPlanner,
    model: JumpDiffusion,
    rng: StdRng,
}

impl FlashCrashSynthesizer {
    pub fn new(planner: CrashPlanner, model: JumpDiffusion, seed: u64) -> Self {
        Self {
            planner,
            model,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Default planner and diffusion parameters with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(CrashPlanner::default(), JumpDiffusion::default(), seed)
    }

    /// Fabricate the crash interval.
    ///
    /// `open` is carried over untouched, preserving visual continuity with
    /// the preceding interval. The returned candle always satisfies
    /// `low <= {open, close} <= high` and `low == target_price`.
    pub fn inject_crash(&mut self, interval: &Candle) -> Result<CrashInjection> {
        interval.validate()?;

        let open = interval.open;
        let mut target = self.planner.find_minimal_crash(open)?;

        // Policy override, not a planner bug: a sub-5% dip reads as noise,
        // so shallow targets are forced down to an unambiguous 8% drop.
        if target.target_price > open * VISIBILITY_FLOOR_FRACTION {
            let displacement = open * FORCED_DROP_FRACTION;
            target = CrashTarget {
                displacement,
                target_price: open - displacement,
                precision: TargetPrecision::ForcedVisibility,
            };
        }

        // Liquidity grab above the open before the reversal
        let excursion = self.rng.gen_range(STOP_HUNT_MIN..STOP_HUNT_MAX);
        let mut high = open * decimal_fraction(1.0 + excursion)?;

        // The stochastic draw colors the rebound only; the floor is always
        // pinned to the planned target, jump or no jump.
        let path = self.model.sample(&mut self.rng);
        let low = target.target_price;

        let excitation = (path.jump.abs() * 10.0).min(1.0);
        let shape = self.rng.gen_range(0.0..1.0_f64).max(excitation);
        let rebound = REBOUND_MIN + (REBOUND_MAX - REBOUND_MIN) * shape;
        let close = low * decimal_fraction(1.0 + rebound)?;

        let panic = self.rng.gen_range(PANIC_VOLUME_MIN..PANIC_VOLUME_MAX);
        let volume = interval.volume * decimal_fraction(panic)?;

        // Invariant repair: a sampled high below the open or close would
        // produce an impossible candle, so widen instead.
        let body_top = open.max(close);
        if high <= body_top {
            high = body_top + body_top * dec!(0.0001);
        }

        let candle = Candle::new(interval.open_time, open, high, low, close, volume);
        debug_assert!(candle.validate().is_ok());

        log::info!(
            "injected crash: {open} -> {low} (displacement {}, {} jumps realized)",
            target.displacement,
            path.jump_count
        );

        Ok(CrashInjection { candle, target })
    }
}

fn decimal_fraction(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or(ChaosError::NumericRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nemesis_core::CandleError;

    fn healthy_candle(open: Decimal) -> Candle {
        Candle::new(
            Utc::now(),
            open,
            open + dec!(50),
            open - dec!(50),
            open + dec!(10),
            dec!(100),
        )
    }

    #[test]
    fn test_candle_invariant_holds() {
        let mut synth = FlashCrashSynthesizer::with_seed(1);
        for seed_offset in 0..50u64 {
            let mut synth_n = FlashCrashSynthesizer::with_seed(seed_offset);
            let injection = synth_n.inject_crash(&healthy_candle(dec!(95000))).unwrap();
            let candle = &injection.candle;
            assert!(candle.validate().is_ok(), "seed {seed_offset}");
            assert!(candle.low <= candle.open && candle.open <= candle.high);
            assert!(candle.low <= candle.close && candle.close <= candle.high);
        }
        // and the floor is exactly the planned target
        let injection = synth.inject_crash(&healthy_candle(dec!(95000))).unwrap();
        assert_eq!(injection.candle.low, injection.target.target_price);
    }

    #[test]
    fn test_open_is_preserved() {
        let mut synth = FlashCrashSynthesizer::with_seed(2);
        let original = healthy_candle(dec!(95000));
        let injection = synth.inject_crash(&original).unwrap();
        assert_eq!(injection.candle.open, original.open);
        assert_eq!(injection.candle.open_time, original.open_time);
        // the input candle itself is untouched
        assert_eq!(original.low, dec!(94950));
    }

    #[test]
    fn test_visibility_clamp_forces_deep_drop() {
        // Planner would pick 94900 (~0.1% drop), far above 95% of the open
        let mut synth = FlashCrashSynthesizer::with_seed(3);
        let injection = synth.inject_crash(&healthy_candle(dec!(95000))).unwrap();

        assert_eq!(
            injection.target.precision,
            TargetPrecision::ForcedVisibility
        );
        assert_eq!(injection.target.target_price, dec!(87400));
        assert_eq!(injection.candle.low, dec!(87400));
    }

    #[test]
    fn test_deep_magnet_escapes_clamp() {
        // open = 1000, granularity 100 -> target 900 = 90% of open
        let planner = CrashPlanner::default();
        let mut synth = FlashCrashSynthesizer::new(planner, JumpDiffusion::default(), 4);
        let injection = synth.inject_crash(&healthy_candle(dec!(1000))).unwrap();

        assert_eq!(injection.target.precision, TargetPrecision::Exact);
        assert_eq!(injection.candle.low, dec!(900));
    }

    #[test]
    fn test_volume_is_inflated() {
        let mut synth = FlashCrashSynthesizer::with_seed(5);
        let original = healthy_candle(dec!(95000));
        let injection = synth.inject_crash(&original).unwrap();

        assert!(injection.candle.volume >= original.volume * dec!(5));
        assert!(injection.candle.volume <= original.volume * dec!(10));
    }

    #[test]
    fn test_seeded_replay_is_identical() {
        let original = healthy_candle(dec!(95000));
        let a = FlashCrashSynthesizer::with_seed(99)
            .inject_crash(&original)
            .unwrap();
        let b = FlashCrashSynthesizer::with_seed(99)
            .inject_crash(&original)
            .unwrap();
        assert_eq!(a.candle, b.candle);
    }

    #[test]
    fn test_rejects_invalid_interval() {
        let mut synth = FlashCrashSynthesizer::with_seed(6);
        let mut broken = healthy_candle(dec!(95000));
        broken.close = Decimal::ZERO;
        assert!(matches!(
            synth.inject_crash(&broken),
            Err(ChaosError::InvalidInterval(CandleError::NonPositivePrice(
                _
            )))
        ));
    }

    #[test]
    fn test_rebound_stays_in_band() {
        let mut synth = FlashCrashSynthesizer::with_seed(7);
        for _ in 0..50 {
            let injection = synth.inject_crash(&healthy_candle(dec!(95000))).unwrap();
            let low = injection.candle.low;
            assert!(injection.candle.close >= low * dec!(1.005));
            assert!(injection.candle.close <= low * dec!(1.015));
        }
    }
}
