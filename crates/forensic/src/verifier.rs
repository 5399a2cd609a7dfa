use nemesis_constraint::{LinExpr, Model, SatResult};
use nemesis_core::{OrderBookSnapshot, Ruling, Side, Trade, Verdict};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ForensicError, Result};

/// Checks whether a recorded execution was mathematically consistent with
/// the liquidity visible in the order book at the time.
///
/// The fair-market invariant: the execution price may differ from the best
/// visible price by no more than the spread plus a slippage allowance
/// (default 1% of the best price). The invariant is asserted over a symbolic
/// `exec_price` variable pinned by equality to the recorded price, so richer
/// multi-constraint invariants can relax the pin later without reshaping the
/// model.
///
/// The historical trade window is accepted for report context only; the
/// current invariant deliberately does not consult it.
#[derive(Debug, Clone)]
pub struct FairExecutionVerifier {
    /// Slippage allowance as a fraction of the best market price
    pub slippage_tolerance: Decimal,
}

impl Default for FairExecutionVerifier {
    fn default() -> Self {
        Self {
            slippage_tolerance: dec!(0.01),
        }
    }
}

impl FairExecutionVerifier {
    pub fn new(slippage_tolerance: Decimal) -> Self {
        Self { slippage_tolerance }
    }

    /// Rule on one trade. A fresh constraint model is built per call.
    ///
    /// Errors with [`ForensicError::MalformedBook`] when a book side is
    /// missing or the book is crossed; solver failures propagate as hard
    /// errors rather than degrading into a verdict.
    pub fn verify(
        &self,
        trade: &Trade,
        history: &[Trade],
        book: &OrderBookSnapshot,
    ) -> Result<Verdict> {
        let (best_bid, _) = book
            .best_bid()
            .ok_or_else(|| ForensicError::MalformedBook("no resting bids".into()))?;
        let (best_ask, _) = book
            .best_ask()
            .ok_or_else(|| ForensicError::MalformedBook("no resting asks".into()))?;

        let spread = best_ask - best_bid;
        if spread < Decimal::ZERO {
            return Err(ForensicError::MalformedBook(format!(
                "crossed book: best bid {best_bid} above best ask {best_ask}"
            )));
        }

        let best_market_price = match trade.side {
            Side::Buy => best_ask,
            Side::Sell => best_bid,
        };
        let allowed_slippage = spread + best_market_price * self.slippage_tolerance;

        log::debug!(
            "verifying {:?} {} @ {} against best {best_market_price} (spread {spread}, {} context trades)",
            trade.side,
            trade.symbol,
            trade.price,
            history.len()
        );

        let mut model = Model::new();
        let exec_price = model.real("exec_price");
        model.assert_eq(exec_price, LinExpr::constant(trade.price));
        // |exec_price - best| <= allowed, split into two linear assertions
        model.assert_le(
            LinExpr::from(exec_price) - LinExpr::constant(best_market_price),
            LinExpr::constant(allowed_slippage),
        );
        model.assert_le(
            LinExpr::constant(best_market_price) - LinExpr::from(exec_price),
            LinExpr::constant(allowed_slippage),
        );

        match model.check()? {
            SatResult::Sat => Ok(Verdict::new(
                Ruling::Clean,
                "execution is mathematically consistent with market liquidity",
            )),
            // UNSAT yields no model, so the details come from the facts
            SatResult::Unsat => Ok(Verdict::new(
                Ruling::LiquidityVoidDetected,
                format!(
                    "execution price {} is impossible given best market price {} and spread {:.2}",
                    trade.price, best_market_price, spread
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nemesis_core::BookLevel;

    fn book(best_bid: Decimal, best_ask: Decimal) -> OrderBookSnapshot {
        OrderBookSnapshot::from_levels(
            vec![
                BookLevel::new(best_bid, dec!(2)),
                BookLevel::new(best_bid - dec!(10), dec!(5)),
            ],
            vec![
                BookLevel::new(best_ask, dec!(2)),
                BookLevel::new(best_ask + dec!(10), dec!(5)),
            ],
        )
    }

    fn buy(price: Decimal) -> Trade {
        Trade::new(Utc::now(), "BTCUSDT", Side::Buy, price, dec!(1))
    }

    #[test]
    fn test_trade_at_best_ask_is_clean() {
        let verifier = FairExecutionVerifier::default();
        let verdict = verifier
            .verify(&buy(dec!(95000)), &[], &book(dec!(94990), dec!(95000)))
            .unwrap();
        assert_eq!(verdict.ruling, Ruling::Clean);
    }

    #[test]
    fn test_double_best_ask_is_void() {
        let verifier = FairExecutionVerifier::default();
        let verdict = verifier
            .verify(&buy(dec!(190000)), &[], &book(dec!(94990), dec!(95000)))
            .unwrap();
        assert_eq!(verdict.ruling, Ruling::LiquidityVoidDetected);
    }

    #[test]
    fn test_death_trade_scenario() {
        // spread = 10, allowed = 10 + 950 = 960, actual diff = 905000
        let verifier = FairExecutionVerifier::default();
        let verdict = verifier
            .verify(&buy(dec!(1000000)), &[], &book(dec!(94990), dec!(95000)))
            .unwrap();

        assert_eq!(verdict.ruling, Ruling::LiquidityVoidDetected);
        assert!(verdict.details.contains("1000000"));
        assert!(verdict.details.contains("95000"));
        assert!(verdict.details.contains("10.00"));
    }

    #[test]
    fn test_slippage_boundary_is_inclusive() {
        // best = 95000, spread = 10, allowed = 960: exactly at the boundary
        let verifier = FairExecutionVerifier::default();
        let boundary = dec!(95000) + dec!(960);

        let at_boundary = verifier
            .verify(&buy(boundary), &[], &book(dec!(94990), dec!(95000)))
            .unwrap();
        assert_eq!(at_boundary.ruling, Ruling::Clean);

        let one_cent_over = verifier
            .verify(
                &buy(boundary + dec!(0.01)),
                &[],
                &book(dec!(94990), dec!(95000)),
            )
            .unwrap();
        assert_eq!(one_cent_over.ruling, Ruling::LiquidityVoidDetected);
    }

    #[test]
    fn test_sell_side_uses_best_bid() {
        let verifier = FairExecutionVerifier::default();
        let sell = Trade::new(Utc::now(), "BTCUSDT", Side::Sell, dec!(94990), dec!(1));
        let verdict = verifier
            .verify(&sell, &[], &book(dec!(94990), dec!(95000)))
            .unwrap();
        assert_eq!(verdict.ruling, Ruling::Clean);

        let dumped = Trade::new(Utc::now(), "BTCUSDT", Side::Sell, dec!(80000), dec!(1));
        let verdict = verifier
            .verify(&dumped, &[], &book(dec!(94990), dec!(95000)))
            .unwrap();
        assert_eq!(verdict.ruling, Ruling::LiquidityVoidDetected);
    }

    #[test]
    fn test_missing_side_is_malformed() {
        let verifier = FairExecutionVerifier::default();
        let one_sided =
            OrderBookSnapshot::from_levels(vec![BookLevel::new(dec!(94990), dec!(1))], vec![]);
        assert!(matches!(
            verifier.verify(&buy(dec!(95000)), &[], &one_sided),
            Err(ForensicError::MalformedBook(_))
        ));
    }

    #[test]
    fn test_crossed_book_is_malformed() {
        let verifier = FairExecutionVerifier::default();
        let crossed = book(dec!(95100), dec!(95000));
        assert!(matches!(
            verifier.verify(&buy(dec!(95000)), &[], &crossed),
            Err(ForensicError::MalformedBook(_))
        ));
    }

    #[test]
    fn test_solver_failure_surfaces_as_error_not_verdict() {
        // An exhausted kernel crosses the crate seam as ForensicError::Solver
        // through the same conversion verify() propagates; no ruling exists
        // on this path.
        let mut model = Model::new();
        let exec_price = model.real("exec_price");
        for i in 0..5000 {
            model.assert_le(exec_price, LinExpr::constant(Decimal::from(i)));
        }
        let failure = model.check().unwrap_err();
        let surfaced = ForensicError::from(failure);
        assert!(matches!(surfaced, ForensicError::Solver(_)), "{surfaced}");
    }

    #[test]
    fn test_history_does_not_alter_verdict() {
        let verifier = FairExecutionVerifier::default();
        let snapshot = book(dec!(94990), dec!(95000));
        let trade = buy(dec!(95000));
        let history: Vec<Trade> = (0..10).map(|_| buy(dec!(1))).collect();

        let without = verifier.verify(&trade, &[], &snapshot).unwrap();
        let with = verifier.verify(&trade, &history, &snapshot).unwrap();
        assert_eq!(without, with);
    }
}
