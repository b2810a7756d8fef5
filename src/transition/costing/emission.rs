use std::f64::consts::TAU;

use crate::transition::costing::{EmissionContext, EmissionStrategy};

/// Gaussian emission density over the projection distance.
///
/// For a candidate at projection distance `d`, the emission is the
/// normal density `exp(-0.5 · ((d − μ) / σ)²) / (σ · √(2π))`, evaluated
/// and stored in log space. It is a density, not a distribution over the
/// layer's candidates: it is only ever used in products and comparisons,
/// so no per-layer normalization applies.
///
/// `sigma` reflects the positional noise of the source (GPS error is the
/// usual calibration); `mu` shifts the most plausible offset away from
/// zero when the source is known to be biased.
#[derive(Clone, Copy, Debug)]
pub struct GaussianEmission {
    sigma: f64,
    mu: f64,
}

impl GaussianEmission {
    /// Callers are expected to have validated `sigma > 0`; see
    /// [`MatchConfig`](crate::transition::MatchConfig).
    pub fn new(sigma: f64, mu: f64) -> Self {
        Self { sigma, mu }
    }
}

impl EmissionStrategy for GaussianEmission {
    fn log_emission(&self, context: EmissionContext) -> f64 {
        let deviation = (context.distance - self.mu) / self.sigma;

        // √(2π) is √τ.
        -0.5 * deviation * deviation - (self.sigma * TAU.sqrt()).ln()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use geo::wkt;

    fn emit(strategy: &GaussianEmission, distance: f64) -> f64 {
        let origin = wkt! { POINT (0.0 0.0) };
        strategy.log_emission(EmissionContext {
            candidate_position: &origin,
            source_position: &origin,
            distance,
        })
    }

    #[test]
    fn matches_the_normal_density() {
        let strategy = GaussianEmission::new(4.0, 0.0);

        // exp(-0.5) / (4 · √(2π)) at one standard deviation.
        let expected = (-0.5f64).exp() / (4.0 * (2.0 * std::f64::consts::PI).sqrt());
        assert_relative_eq!(emit(&strategy, 4.0).exp(), expected, max_relative = 1e-12);
    }

    #[test]
    fn maximal_at_mu_and_decreasing_either_side() {
        let strategy = GaussianEmission::new(5.0, 10.0);

        let peak = emit(&strategy, 10.0);
        assert!(peak > emit(&strategy, 5.0));
        assert!(peak > emit(&strategy, 15.0));

        // Strictly decreasing as distance diverges in either direction.
        assert!(emit(&strategy, 5.0) > emit(&strategy, 0.0));
        assert!(emit(&strategy, 15.0) > emit(&strategy, 20.0));
    }
}
