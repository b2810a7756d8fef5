use geo::{Distance, Haversine};
use log::debug;
use rayon::prelude::*;

use crate::network::NetworkPort;
use crate::primitives::Trajectory;
use crate::transition::candidate::{Candidate, CandidateId, Candidates};
use crate::transition::costing::{
    CostingStrategies, EmissionContext, EmissionStrategy, TransitionStrategy,
};
use crate::transition::error::MatchError;
use crate::transition::layer::{Layer, Layers};

/// Generates the per-observation candidate layers of the trellis.
///
/// For each observation the network is asked for every edge within the
/// search radius, and each such edge yields exactly one candidate: the
/// observation's projection onto the edge segment (clamped to the
/// nearest endpoint when the orthogonal foot falls outside it). The
/// emission probability is computed here, once, and stored on the
/// candidate.
///
/// Layers are independent of one another and generated in parallel;
/// candidate identity is deterministic (layer = observation index,
/// node = the port's edge enumeration order).
pub struct LayerGenerator<'a, N, E, T>
where
    N: NetworkPort + ?Sized,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    network: &'a N,
    heuristics: &'a CostingStrategies<E, T>,

    /// Candidate search radius (meters), constant across the trajectory.
    max_distance: f64,
}

impl<'a, N, E, T> LayerGenerator<'a, N, E, T>
where
    N: NetworkPort + ?Sized,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    pub fn new(network: &'a N, heuristics: &'a CostingStrategies<E, T>, max_distance: f64) -> Self {
        Self {
            network,
            heuristics,
            max_distance,
        }
    }

    /// Generates every layer, or fails on the first observation with no
    /// in-radius edges. An empty layer is fatal for the whole decode: a
    /// silently skipped observation would drop a trajectory point.
    pub fn with_trajectory(
        &self,
        trajectory: &Trajectory,
    ) -> Result<(Layers, Candidates), MatchError> {
        let generated = trajectory
            .observations()
            .par_iter()
            .enumerate()
            .map(|(layer_id, observation)| {
                let edges = self
                    .network
                    .edges_within(&observation.position, self.max_distance)
                    .map_err(|source| MatchError::Network {
                        index: layer_id,
                        source,
                    })?;

                let candidates = edges
                    .into_iter()
                    .enumerate()
                    .map(|(node_id, edge)| {
                        let position = edge.project(&observation.position);
                        let distance = Haversine.distance(position, observation.position);

                        let log_emission = self.heuristics.emission(EmissionContext {
                            candidate_position: &position,
                            source_position: &observation.position,
                            distance,
                        });

                        Candidate {
                            id: CandidateId::new(layer_id, node_id),
                            edge,
                            position,
                            distance,
                            log_emission,
                        }
                    })
                    .collect::<Vec<_>>();

                debug!(
                    "layer {layer_id}: {} candidate(s) within {}m",
                    candidates.len(),
                    self.max_distance
                );

                if candidates.is_empty() {
                    return Err(MatchError::NoCandidates { index: layer_id });
                }

                Ok(candidates)
            })
            .collect::<Result<Vec<Vec<Candidate>>, MatchError>>()?;

        let layers = generated
            .iter()
            .zip(trajectory.observations())
            .map(|(candidates, observation)| Layer {
                origin: observation.position,
                nodes: candidates.iter().map(|candidate| candidate.id).collect(),
            })
            .collect::<Vec<_>>();

        Ok((Layers::new(layers), Candidates::from_layers(generated)))
    }
}
