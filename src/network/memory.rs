use geo::{Destination, Distance, Geodesic, Haversine, Point};
use log::warn;
use petgraph::prelude::DiGraphMap;
use petgraph::visit::EdgeRef;
use rstar::primitives::{GeomWithData, Line as IndexLine};
use rstar::{RTree, AABB};
use rustc_hash::FxHashMap;

use crate::network::{EdgeId, NetworkEdge, NetworkError, NetworkPort, NodeId};

type IndexedNode = GeomWithData<[f64; 2], NodeId>;
type IndexedEdge = GeomWithData<IndexLine<[f64; 2]>, EdgeId>;

/// The bundled reference implementation of [`NetworkPort`].
///
/// Holds the network as a directed graph weighted by haversine edge
/// length, alongside two R-trees: one over nodes (point snapping) and one
/// over edge segments (radius queries). Suitable for tests and small
/// workloads; larger deployments are expected to bring their own port.
///
/// Shortest-path queries between arbitrary points snap each endpoint to
/// its nearest network node, and include the snap legs in the reported
/// distance.
pub struct InMemoryNetwork {
    graph: DiGraphMap<NodeId, f64>,
    nodes: FxHashMap<NodeId, Point<f64>>,
    edges: FxHashMap<EdgeId, NetworkEdge>,

    node_index: RTree<IndexedNode>,
    edge_index: RTree<IndexedEdge>,
}

impl InMemoryNetwork {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    fn position(&self, node: NodeId) -> Option<Point<f64>> {
        self.nodes.get(&node).copied()
    }

    /// Snaps an arbitrary position to its nearest network node.
    fn snap(&self, point: &Point<f64>) -> Option<NodeId> {
        self.node_index
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|node| node.data)
    }

    /// Shortest node-to-node path, as `(total_weight, node_chain)`.
    fn route(&self, from: NodeId, to: NodeId) -> Option<(f64, Vec<NodeId>)> {
        let goal = self.position(to)?;

        petgraph::algo::astar(
            &self.graph,
            from,
            |node| node == to,
            |edge| *edge.weight(),
            |node| {
                self.position(node)
                    .map_or(0.0, |position| Haversine.distance(position, goal))
            },
        )
    }
}

impl NetworkPort for InMemoryNetwork {
    fn edges_within(
        &self,
        point: &Point<f64>,
        radius: f64,
    ) -> Result<Vec<NetworkEdge>, NetworkError> {
        // Best-effort square search region, refined below by the true
        // projected haversine distance.
        let bottom_right = Geodesic.destination(*point, 135.0, radius);
        let top_left = Geodesic.destination(*point, 315.0, radius);

        let bbox = AABB::from_corners(
            [top_left.x(), top_left.y()],
            [bottom_right.x(), bottom_right.y()],
        );

        let mut within = self
            .edge_index
            .locate_in_envelope_intersecting(&bbox)
            .filter_map(|indexed| self.edges.get(&indexed.data))
            .filter_map(|edge| {
                let distance = Haversine.distance(edge.project(point), *point);
                (distance <= radius).then_some((*edge, distance))
            })
            .collect::<Vec<_>>();

        // R-tree iteration order is arbitrary; candidate enumeration
        // order must not be.
        within.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)));

        Ok(within.into_iter().map(|(edge, _)| edge).collect())
    }

    fn shortest_path_distance(
        &self,
        from: &Point<f64>,
        to: &Point<f64>,
    ) -> Result<Option<f64>, NetworkError> {
        let (Some(source), Some(target)) = (self.snap(from), self.snap(to)) else {
            return Ok(None);
        };

        let legs = |via: f64| {
            let entry = self
                .position(source)
                .map_or(0.0, |position| Haversine.distance(*from, position));
            let exit = self
                .position(target)
                .map_or(0.0, |position| Haversine.distance(position, *to));

            entry + via + exit
        };

        if source == target {
            return Ok(Some(legs(0.0)));
        }

        Ok(self.route(source, target).map(|(weight, _)| legs(weight)))
    }

    fn shortest_path_geometry(
        &self,
        from: &Point<f64>,
        to: &Point<f64>,
    ) -> Result<Option<Vec<Point<f64>>>, NetworkError> {
        let (Some(source), Some(target)) = (self.snap(from), self.snap(to)) else {
            return Ok(None);
        };

        let chain = if source == target {
            vec![source]
        } else {
            match self.route(source, target) {
                Some((_, chain)) => chain,
                None => return Ok(None),
            }
        };

        let mut geometry = Vec::with_capacity(chain.len() + 2);
        geometry.push(*from);
        geometry.extend(chain.into_iter().filter_map(|node| self.position(node)));
        geometry.push(*to);
        geometry.dedup();

        Ok(Some(geometry))
    }
}

/// Assembles an [`InMemoryNetwork`] from raw nodes and edges.
#[derive(Default)]
pub struct Builder {
    nodes: Vec<(NodeId, Point<f64>)>,
    edges: Vec<EdgeId>,
}

impl Builder {
    pub fn node(mut self, id: NodeId, position: Point<f64>) -> Self {
        self.nodes.push((id, position));
        self
    }

    /// A one-way edge from `source` to `target`.
    pub fn edge(mut self, source: NodeId, target: NodeId) -> Self {
        self.edges.push((source, target));
        self
    }

    /// A two-way connection: both directed edges between the pair.
    pub fn two_way(self, a: NodeId, b: NodeId) -> Self {
        self.edge(a, b).edge(b, a)
    }

    pub fn build(self) -> InMemoryNetwork {
        let nodes: FxHashMap<NodeId, Point<f64>> = self.nodes.into_iter().collect();

        let mut graph = DiGraphMap::new();
        let mut edges = FxHashMap::default();
        let mut indexed_edges = Vec::with_capacity(self.edges.len());

        for (source, target) in self.edges {
            let (Some(&from), Some(&to)) = (nodes.get(&source), nodes.get(&target)) else {
                warn!("edge ({source}, {target}) references a missing node, skipping");
                continue;
            };

            graph.add_edge(source, target, Haversine.distance(from, to));
            edges.insert(
                (source, target),
                NetworkEdge::new((source, target), from, to),
            );

            indexed_edges.push(IndexedEdge::new(
                IndexLine::new([from.x(), from.y()], [to.x(), to.y()]),
                (source, target),
            ));
        }

        let indexed_nodes = nodes
            .iter()
            .map(|(id, position)| IndexedNode::new([position.x(), position.y()], *id))
            .collect::<Vec<_>>();

        InMemoryNetwork {
            graph,
            nodes,
            edges,
            node_index: RTree::bulk_load(indexed_nodes),
            edge_index: RTree::bulk_load(indexed_edges),
        }
    }
}
