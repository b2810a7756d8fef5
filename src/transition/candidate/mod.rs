//! Candidates: the hidden states of the matching model.
//!
//! Each observation spawns one candidate per nearby network edge: the
//! projection of the observation onto that edge. Candidates are immutable
//! once generated; decoding state (scores, back-pointers) lives in the
//! solver's table, never on the candidate itself.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::network::NetworkEdge;

/// Identifies a candidate by its position in the trellis:
/// `layer` is the observation index, `node` the enumeration order of the
/// candidate within that observation's layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId {
    pub layer: usize,
    pub node: usize,
}

impl CandidateId {
    pub fn new(layer: usize, node: usize) -> Self {
        Self { layer, node }
    }
}

/// A candidate map location for a single observation.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub id: CandidateId,

    /// The network edge the observation was projected onto.
    pub edge: NetworkEdge,

    /// The projected position upon that edge.
    pub position: Point<f64>,

    /// Haversine distance (meters) between the observation and
    /// [`position`](#structfield.position).
    pub distance: f64,

    /// Log-space emission probability, computed once at generation.
    pub log_emission: f64,
}

/// Dense per-layer candidate storage, addressed by [`CandidateId`].
#[derive(Debug, Default)]
pub struct Candidates {
    layers: Vec<Vec<Candidate>>,
}

impl Candidates {
    pub(crate) fn from_layers(layers: Vec<Vec<Candidate>>) -> Self {
        Self { layers }
    }

    pub fn candidate(&self, id: &CandidateId) -> Option<&Candidate> {
        self.layers.get(id.layer)?.get(id.node)
    }

    /// All candidates of one layer, in enumeration (tie-break) order.
    pub fn layer(&self, layer: usize) -> &[Candidate] {
        self.layers.get(layer).map_or(&[], Vec::as_slice)
    }

    /// Number of layers (equals the trajectory length).
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Total candidates across all layers.
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }
}
