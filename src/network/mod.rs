//! The network port: the external capability the matcher consumes.
//!
//! The core never loads or stores a road network itself. It asks an
//! implementation of [`NetworkPort`] two kinds of question ("which edges
//! lie near this point", "how do I travel between these two points")
//! and remains agnostic of how those are answered. [`InMemoryNetwork`]
//! is the bundled reference implementation.

#[doc(hidden)]
pub mod memory;

#[doc(inline)]
pub use memory::InMemoryNetwork;

use geo::{Distance, Haversine, InterpolatableLine, Line, LineLocatePoint, Point};
use thiserror::Error;

/// Identifier of a node within the underlying network.
pub type NodeId = i64;

/// A directed edge, identified by its `(source, target)` node pair.
pub type EdgeId = (NodeId, NodeId);

/// A network edge with enough geometry to project a point onto it.
///
/// This is the unit returned by [`NetworkPort::edges_within`], and the
/// edge reference carried by every matched candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkEdge {
    pub id: EdgeId,
    pub source: Point<f64>,
    pub target: Point<f64>,
}

impl NetworkEdge {
    pub fn new(id: EdgeId, source: Point<f64>, target: Point<f64>) -> Self {
        Self { id, source, target }
    }

    /// The edge's segment geometry.
    pub fn line(&self) -> Line<f64> {
        Line::new(self.source, self.target)
    }

    /// Projects a point orthogonally onto this edge's segment.
    ///
    /// The projection fraction is clamped to the segment, so positions
    /// beyond either end resolve to the nearest endpoint. Zero-length
    /// edges resolve to the source endpoint.
    pub fn project(&self, point: &Point<f64>) -> Point<f64> {
        let line = self.line();

        line.line_locate_point(point)
            .map(|fraction| line.point_at_ratio_from_start(&Haversine, fraction))
            .unwrap_or(self.source)
    }

    /// Haversine distance (meters) between a point and its projection
    /// onto this edge.
    pub fn projection_distance(&self, point: &Point<f64>) -> f64 {
        Haversine.distance(self.project(point), *point)
    }
}

/// Failures raised by a network port implementation.
///
/// These are propagated to the caller untouched; the matcher never
/// retries a port query. Retry policy, if any, belongs to the port.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("spatial query failed: {0}")]
    SpatialQuery(String),

    #[error("routing query failed: {0}")]
    Routing(String),
}

/// The capabilities the matching core requires of a road/track network.
///
/// Implementations must be safe to query concurrently; the matcher issues
/// queries in parallel with no ordering requirement between them, and
/// treats the port as read-only for the duration of a decode.
pub trait NetworkPort: Send + Sync {
    /// All edges within `radius` (meters) of `point`.
    ///
    /// The returned order defines candidate enumeration order for the
    /// observation being matched, so it should be deterministic for
    /// identical inputs.
    fn edges_within(&self, point: &Point<f64>, radius: f64)
        -> Result<Vec<NetworkEdge>, NetworkError>;

    /// Network distance (meters) of the shortest path between two points
    /// on the network, or `None` when no connecting path exists.
    fn shortest_path_distance(
        &self,
        from: &Point<f64>,
        to: &Point<f64>,
    ) -> Result<Option<f64>, NetworkError>;

    /// Geometry of the shortest path between two points on the network,
    /// or `None` when no connecting path exists.
    fn shortest_path_geometry(
        &self,
        from: &Point<f64>,
        to: &Point<f64>,
    ) -> Result<Option<Vec<Point<f64>>>, NetworkError>;
}
