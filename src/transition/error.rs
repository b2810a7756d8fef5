use thiserror::Error;

use crate::network::NetworkError;

/// Failures of a match request.
///
/// Every variant that concerns a particular point of the input carries
/// the observation index (or decode step) it occurred at, so callers can
/// point at the offending sample. Degenerate-but-recoverable conditions
/// (zero-sum fan-outs, decoder resets) are not errors; they surface as
/// log diagnostics and on [`MatchedPath::resets`](crate::transition::MatchedPath::resets).
#[derive(Error, Debug)]
pub enum MatchError {
    /// The input trajectory contained no observations.
    #[error("trajectory contains no observations")]
    EmptyTrajectory,

    /// An observation had no network edge within the search radius.
    #[error("no candidates within search radius of observation {index}")]
    NoCandidates { index: usize },

    /// Route assembly found no connecting path between the matched
    /// candidates of pair `index` and `index + 1`.
    #[error("no network path between matched candidates {index} and {}", index + 1)]
    UnreachableSegment { index: usize },

    /// A network-port query failed while processing observation `index`.
    #[error("network query failed at observation {index}")]
    Network {
        index: usize,
        #[source]
        source: NetworkError,
    },

    /// The decode observed its cancellation token before step `step`.
    #[error("decode cancelled at step {step}")]
    Cancelled { step: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
