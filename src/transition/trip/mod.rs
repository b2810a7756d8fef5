//! The decoded result: one matched candidate per observation, and the
//! assembly of that chain into continuous route geometry.

#[cfg(test)]
mod test;

use geo::LineString;
use itertools::Itertools;

use crate::network::NetworkPort;
use crate::transition::candidate::Candidate;
use crate::transition::error::MatchError;

/// One decoded entry: the chosen candidate for an observation and the
/// cumulative log-probability of the best chain ending there.
#[derive(Clone, Copy, Debug)]
pub struct MatchedCandidate {
    pub candidate: Candidate,
    pub log_probability: f64,
}

/// The best-scoring candidate sequence, one entry per observation.
///
/// Immutable output of a decode. `len()` always equals the trajectory
/// length; reset diagnostics record the steps at which the decoder had
/// to re-anchor (see the solver's reset policy).
#[derive(Clone, Debug)]
pub struct MatchedPath {
    entries: Vec<MatchedCandidate>,
    resets: Vec<usize>,
}

impl MatchedPath {
    pub(crate) fn new(entries: Vec<MatchedCandidate>, resets: Vec<usize>) -> Self {
        Self { entries, resets }
    }

    pub fn entries(&self) -> &[MatchedCandidate] {
        &self.entries
    }

    /// Steps at which the decoder re-anchored on emission alone.
    pub fn resets(&self) -> &[usize] {
        &self.resets
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cumulative log-probability of the full decoded chain.
    pub fn score(&self) -> f64 {
        self.entries
            .last()
            .map_or(f64::NEG_INFINITY, |entry| entry.log_probability)
    }

    /// The matched positions as bare linestring geometry.
    pub fn matched(&self) -> LineString<f64> {
        self.entries
            .iter()
            .map(|entry| entry.candidate.position)
            .collect()
    }
}

/// One leg of the assembled route: the shortest-path geometry between
/// two consecutive matched candidates, annotated with the cumulative
/// probabilities of its bounding candidates for attribute export.
#[derive(Clone, Debug)]
pub struct RouteSegment {
    pub geometry: LineString<f64>,
    pub start_probability: f64,
    pub end_probability: f64,
}

/// Converts a decoded [`MatchedPath`] into continuous route geometry.
///
/// Queries the network for the shortest-path geometry between each
/// consecutive pair of matched candidates. A pair the network reports
/// as unreachable aborts assembly with that pair's index; a decoded
/// sequence is connected by construction when transition probabilities
/// came from reachable pairs only, so an unreachable pair here is a
/// contract violation upstream, not a condition to paper over.
///
/// A single-observation match assembles to an empty route.
pub fn assemble_path<N>(matched: &MatchedPath, network: &N) -> Result<Vec<RouteSegment>, MatchError>
where
    N: NetworkPort,
{
    matched
        .entries()
        .iter()
        .tuple_windows()
        .enumerate()
        .map(|(index, (start, end))| {
            let points = network
                .shortest_path_geometry(&start.candidate.position, &end.candidate.position)
                .map_err(|source| MatchError::Network { index, source })?
                .ok_or(MatchError::UnreachableSegment { index })?;

            Ok(RouteSegment {
                geometry: points.into_iter().collect(),
                start_probability: start.log_probability,
                end_probability: end.log_probability,
            })
        })
        .collect()
}
