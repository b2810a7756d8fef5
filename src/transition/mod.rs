//! A Hidden-Markov-Model (HMM) matching
//! transition module that matches raw positional
//! traces to an underlying network.

pub mod candidate;
pub mod costing;
pub mod error;
pub mod hooks;
pub mod layer;
pub mod solver;
pub mod trip;


// Re-Exports
#[doc(inline)]
pub use candidate::*;
#[doc(inline)]
pub use costing::*;
#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use hooks::*;
#[doc(inline)]
pub use layer::*;
#[doc(inline)]
pub use solver::*;
#[doc(inline)]
pub use trip::*;

use serde::{Deserialize, Serialize};

use crate::network::NetworkPort;
use crate::primitives::Trajectory;

/// Configuration surface of a decode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Candidate search radius (meters), constant across the trajectory.
    pub max_distance: f64,

    /// Standard deviation of the emission Gaussian (meters).
    pub sigma: f64,

    /// Mean of the emission Gaussian (meters).
    pub mu: f64,
}

impl MatchConfig {
    pub fn new(max_distance: f64, sigma: f64, mu: f64) -> Result<Self, MatchError> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(MatchError::InvalidConfig("max_distance must be positive"));
        }

        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(MatchError::InvalidConfig("sigma must be positive"));
        }

        if !mu.is_finite() {
            return Err(MatchError::InvalidConfig("mu must be finite"));
        }

        Ok(Self {
            max_distance,
            sigma,
            mu,
        })
    }

    /// Re-checks the invariants of [`MatchConfig::new`]; fields are
    /// public, so literally-constructed configs are validated at decode.
    pub fn validate(&self) -> Result<(), MatchError> {
        MatchConfig::new(self.max_distance, self.sigma, self.mu).map(|_| ())
    }
}

/// The transition graph of one match request: the trajectory's candidate
/// layers bound to the network and costing strategies that scored them.
///
/// This is the orchestration point for map matching. Constructing it
/// generates every candidate layer up front (which queries the network
/// once per observation); [`solve`](Transition::solve) then decodes the
/// trellis with the supplied [`Solver`].
///
/// For the common case, [`decode`] wraps construction and solving into
/// one call.
pub struct Transition<'a, N, E, T>
where
    N: NetworkPort,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    network: &'a N,
    trajectory: &'a Trajectory,
    heuristics: CostingStrategies<E, T>,

    candidates: Candidates,
    layers: Layers,
}

impl<'a, N, E, T> Transition<'a, N, E, T>
where
    N: NetworkPort,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    /// Generates the candidate layers for `trajectory` and binds them
    /// into a solvable transition graph.
    ///
    /// Fails with [`MatchError::NoCandidates`] when any observation has
    /// no in-radius edge, and propagates network-port failures.
    pub fn new(
        network: &'a N,
        trajectory: &'a Trajectory,
        heuristics: CostingStrategies<E, T>,
        max_distance: f64,
    ) -> Result<Self, MatchError> {
        let generator = LayerGenerator::new(network, &heuristics, max_distance);
        let (layers, candidates) = generator.with_trajectory(trajectory)?;

        Ok(Self {
            network,
            trajectory,
            heuristics,
            candidates,
            layers,
        })
    }

    pub fn network(&self) -> &'a N {
        self.network
    }

    pub fn trajectory(&self) -> &'a Trajectory {
        self.trajectory
    }

    pub fn heuristics(&self) -> &CostingStrategies<E, T> {
        &self.heuristics
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    /// Decodes the trellis with the supplied solver.
    pub fn solve(&self, solver: impl Solver, hooks: Hooks<'_>) -> Result<MatchedPath, MatchError> {
        solver.solve(self, hooks)
    }
}

/// Matches a trajectory onto the network: candidate generation, Viterbi
/// decoding, one matched candidate per observation.
///
/// The returned path always has exactly `trajectory.len()` entries.
pub fn decode<N>(
    trajectory: &Trajectory,
    network: &N,
    config: &MatchConfig,
    hooks: Hooks<'_>,
) -> Result<MatchedPath, MatchError>
where
    N: NetworkPort,
{
    config.validate()?;

    let heuristics = CostingStrategies::gaussian(config.sigma, config.mu);
    let transition = Transition::new(network, trajectory, heuristics, config.max_distance)?;

    transition.solve(ViterbiSolver, hooks)
}
