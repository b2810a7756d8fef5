//! Probability strategies for the matching model.
//!
//! Two seams feed the solver: an [`EmissionStrategy`] scoring how well a
//! candidate explains its observation, and a [`TransitionStrategy`]
//! scoring how plausible the movement between two candidates is. Both are
//! joined on the aggregate [`CostingStrategies`] supplied to
//! [`Transition::new`](crate::transition::Transition::new), so either
//! heuristic can be overridden without touching the decoder.
//!
//! The defaults implement the standard model: a Gaussian positional
//! density ([`GaussianEmission`]) and a routed-distance ratio combined
//! with heading agreement ([`RoutedRatio`]).
//!
//! Raw transition scores are normalized per fan-out by the solver (the
//! normalization spans a whole candidate set, which a per-pair strategy
//! cannot see).

#[doc(hidden)]
pub mod emission;
#[doc(hidden)]
pub mod transition;

#[doc(inline)]
pub use emission::*;
#[doc(inline)]
pub use transition::*;

use geo::Point;

use crate::network::{NetworkError, NetworkPort};
use crate::primitives::Observation;
use crate::transition::candidate::Candidate;

/// Context supplied to an [`EmissionStrategy`].
#[derive(Clone, Copy, Debug)]
pub struct EmissionContext<'a> {
    /// The proposed (candidate) position upon the network.
    pub candidate_position: &'a Point<f64>,

    /// The observed position being matched.
    pub source_position: &'a Point<f64>,

    /// Haversine distance (meters) between the two, computed once during
    /// generation and passed on rather than derived twice.
    pub distance: f64,
}

/// Context supplied to a [`TransitionStrategy`] for one candidate pair.
#[derive(Clone, Copy)]
pub struct TransitionContext<'a> {
    /// Candidate the movement starts from (time `t - 1`).
    pub source: &'a Candidate,

    /// Candidate the movement arrives at (time `t`).
    pub target: &'a Candidate,

    pub previous_observation: &'a Observation,
    pub current_observation: &'a Observation,

    /// Routing access for strategies that query the network.
    pub network: &'a dyn NetworkPort,
}

/// Scores how well a candidate explains the observation it was
/// generated from. Returns a log-space probability density.
pub trait EmissionStrategy: Send + Sync {
    fn log_emission(&self, context: EmissionContext) -> f64;
}

/// Scores the plausibility of moving between two candidates across one
/// time step. Both components are raw (un-normalized) scores in `[0, 1]`.
pub trait TransitionStrategy: Send + Sync {
    /// Routing-distance plausibility: how closely the network path
    /// between the candidates tracks the observed straight-line travel.
    fn routing(&self, context: &TransitionContext) -> Result<f64, NetworkError>;

    /// Heading plausibility: how closely the candidate-to-candidate
    /// bearing matches the observation-to-observation bearing.
    fn heading(&self, context: &TransitionContext) -> f64;
}

/// The aggregate strategy pair consumed by the transition graph.
pub struct CostingStrategies<E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    emission: E,
    transition: T,
}

impl<E, T> CostingStrategies<E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    pub fn new(emission: E, transition: T) -> Self {
        Self {
            emission,
            transition,
        }
    }

    pub fn emission(&self, context: EmissionContext) -> f64 {
        self.emission.log_emission(context)
    }

    pub fn routing(&self, context: &TransitionContext) -> Result<f64, NetworkError> {
        self.transition.routing(context)
    }

    pub fn heading(&self, context: &TransitionContext) -> f64 {
        self.transition.heading(context)
    }
}

impl CostingStrategies<GaussianEmission, RoutedRatio> {
    /// The default model: Gaussian emission with the supplied parameters,
    /// routed-ratio transition.
    pub fn gaussian(sigma: f64, mu: f64) -> Self {
        CostingStrategies::new(GaussianEmission::new(sigma, mu), RoutedRatio)
    }
}
