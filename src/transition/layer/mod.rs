#[doc(hidden)]
pub mod generator;
#[doc(inline)]
pub use generator::*;

use geo::Point;

use crate::transition::candidate::CandidateId;

/// A layer within the transition trellis: one observation and the
/// candidates generated for it.
pub struct Layer {
    /// The observed position this layer was generated from.
    pub origin: Point<f64>,

    /// Candidate ids of this layer, in enumeration (tie-break) order.
    pub nodes: Vec<CandidateId>,
}

/// All layers of a decode, one per observation, in trajectory order.
#[derive(Default)]
pub struct Layers {
    layers: Vec<Layer>,
}

impl Layers {
    pub(crate) fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn get(&self, layer: usize) -> Option<&Layer> {
        self.layers.get(layer)
    }

    pub fn first(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }
}
