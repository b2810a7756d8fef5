#[doc(hidden)]
pub mod viterbi;
#[doc(inline)]
pub use viterbi::*;

use crate::network::NetworkPort;
use crate::transition::costing::{EmissionStrategy, TransitionStrategy};
use crate::transition::error::MatchError;
use crate::transition::hooks::Hooks;
use crate::transition::trip::MatchedPath;
use crate::transition::Transition;

/// Decodes a prepared transition trellis into the single best candidate
/// sequence.
///
/// [`ViterbiSolver`] is the canonical implementation; the seam exists so
/// an equivalent formulation (e.g. explicit trellis shortest-path over
/// `-log` edge weights) can be dropped in and must yield the identical
/// matched path.
pub trait Solver {
    fn solve<N, E, T>(
        &self,
        transition: &Transition<'_, N, E, T>,
        hooks: Hooks<'_>,
    ) -> Result<MatchedPath, MatchError>
    where
        N: NetworkPort,
        E: EmissionStrategy,
        T: TransitionStrategy;
}
