#![doc = include_str!("../README.md")]

pub mod network;
pub mod primitives;
pub mod transition;

#[doc(inline)]
pub use network::{EdgeId, InMemoryNetwork, NetworkEdge, NetworkError, NetworkPort, NodeId};
#[doc(inline)]
pub use primitives::{Observation, Trajectory};
#[doc(inline)]
pub use transition::{
    assemble_path, decode, CancellationToken, Hooks, MatchConfig, MatchError, MatchedCandidate,
    MatchedPath, Progress, RouteSegment, Transition,
};
