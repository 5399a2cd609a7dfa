use rand::Rng;
use rand_distr::{Normal, Poisson, StandardNormal};
use serde::{Deserialize, Serialize};

/// Merton-style jump-diffusion parameters for one interval.
///
/// The continuous part is geometric Brownian motion,
/// `(mu - sigma^2/2)*dt + sigma*sqrt(dt)*Z`; the discontinuous part is a
/// compound Poisson process with `N ~ Poisson(lambda*dt)` jumps, each drawn
/// from `Normal(jump_mean, jump_sigma)`. Both act on log-price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JumpDiffusion {
    /// Annualized drift (mu)
    pub drift: f64,
    /// Annualized volatility (sigma)
    pub volatility: f64,
    /// Expected jumps per unit time (lambda)
    pub jump_intensity: f64,
    /// Mean log-jump size; negative for crash coloring
    pub jump_mean: f64,
    /// Log-jump size dispersion
    pub jump_sigma: f64,
    /// Interval length as a fraction of the unit time
    pub dt: f64,
}

impl Default for JumpDiffusion {
    fn default() -> Self {
        // Tuned for a one-minute interval during a liquidation cascade:
        // high local volatility, frequent negative jumps.
        Self {
            drift: 0.0,
            volatility: 0.8,
            jump_intensity: 120.0,
            jump_mean: -0.03,
            jump_sigma: 0.02,
            dt: 1.0 / 1440.0,
        }
    }
}

/// One realization of the process. Consumers read the components directly:
/// the synthesizer colors the rebound from the jump term alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpPath {
    /// Diffusion contribution to the log-return
    pub diffusion: f64,
    /// Summed jump contribution to the log-return
    pub jump: f64,
    /// Number of Poisson jumps realized
    pub jump_count: u64,
}

impl JumpDiffusion {
    /// Draw one realization of the interval's log-return.
    ///
    /// Degenerate parameters (zero volatility, zero intensity) collapse to
    /// the corresponding deterministic component instead of failing.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> JumpPath {
        let drift_term = (self.drift - 0.5 * self.volatility * self.volatility) * self.dt;
        let noise = if self.volatility > 0.0 && self.dt > 0.0 {
            let z: f64 = rng.sample(StandardNormal);
            self.volatility * self.dt.sqrt() * z
        } else {
            0.0
        };

        let rate = self.jump_intensity * self.dt;
        let jump_count = match Poisson::new(rate) {
            Ok(dist) => rng.sample(dist) as u64,
            Err(_) => 0, // rate <= 0 or non-finite: no jumps
        };

        let jump = match Normal::new(self.jump_mean, self.jump_sigma) {
            Ok(dist) => (0..jump_count).map(|_| rng.sample(dist)).sum(),
            Err(_) => self.jump_mean * jump_count as f64,
        };

        JumpPath {
            diffusion: drift_term + noise,
            jump,
            jump_count,
        }
    }
}
