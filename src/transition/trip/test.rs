use geo::{wkt, Point};

use crate::network::{InMemoryNetwork, NetworkEdge, NetworkError, NetworkPort};
use crate::primitives::Trajectory;
use crate::transition::candidate::{Candidate, CandidateId};
use crate::transition::trip::{assemble_path, MatchedCandidate, MatchedPath};
use crate::transition::{decode, Hooks, MatchConfig, MatchError};

fn street() -> InMemoryNetwork {
    InMemoryNetwork::builder()
        .node(1, wkt! { POINT (151.0000 -33.8000) })
        .node(2, wkt! { POINT (151.0010 -33.8000) })
        .node(3, wkt! { POINT (151.0020 -33.8000) })
        .two_way(1, 2)
        .two_way(2, 3)
        .build()
}

fn entry(id: CandidateId, position: Point<f64>) -> MatchedCandidate {
    MatchedCandidate {
        candidate: Candidate {
            id,
            edge: NetworkEdge::new((1, 2), position, position),
            position,
            distance: 0.0,
            log_emission: 0.0,
        },
        log_probability: -1.0 * (id.layer + 1) as f64,
    }
}

#[test]
fn assembles_one_segment_per_consecutive_pair() {
    let network = street();
    let trajectory = Trajectory::from_linestring(wkt! {
        LINESTRING (151.0001 -33.80005, 151.0009 -33.79996, 151.0019 -33.80004)
    })
    .unwrap();

    let matched = decode(
        &trajectory,
        &network,
        &MatchConfig::new(50.0, 10.0, 0.0).unwrap(),
        Hooks::default(),
    )
    .unwrap();

    let route = assemble_path(&matched, &network).unwrap();
    assert_eq!(route.len(), matched.len() - 1);

    for (index, segment) in route.iter().enumerate() {
        let start = &matched.entries()[index];
        let end = &matched.entries()[index + 1];

        // Each leg spans its bounding candidates and carries their
        // cumulative probabilities.
        assert_eq!(segment.geometry.points().next(), Some(start.candidate.position));
        assert_eq!(segment.geometry.points().last(), Some(end.candidate.position));
        assert_eq!(segment.start_probability, start.log_probability);
        assert_eq!(segment.end_probability, end.log_probability);
    }
}

#[test]
fn unreachable_pair_aborts_with_its_index() {
    struct Unroutable;

    impl NetworkPort for Unroutable {
        fn edges_within(
            &self,
            _: &Point<f64>,
            _: f64,
        ) -> Result<Vec<NetworkEdge>, NetworkError> {
            Ok(vec![])
        }

        fn shortest_path_distance(
            &self,
            _: &Point<f64>,
            _: &Point<f64>,
        ) -> Result<Option<f64>, NetworkError> {
            Ok(None)
        }

        fn shortest_path_geometry(
            &self,
            _: &Point<f64>,
            _: &Point<f64>,
        ) -> Result<Option<Vec<Point<f64>>>, NetworkError> {
            Ok(None)
        }
    }

    let matched = MatchedPath::new(
        vec![
            entry(CandidateId::new(0, 0), wkt! { POINT (151.0000 -33.8000) }),
            entry(CandidateId::new(1, 0), wkt! { POINT (151.0010 -33.8000) }),
        ],
        vec![],
    );

    match assemble_path(&matched, &Unroutable) {
        Err(MatchError::UnreachableSegment { index }) => assert_eq!(index, 0),
        other => panic!("expected UnreachableSegment, got {other:?}"),
    }
}

#[test]
fn single_entry_assembles_to_an_empty_route() {
    let network = street();
    let matched = MatchedPath::new(
        vec![entry(
            CandidateId::new(0, 0),
            wkt! { POINT (151.0000 -33.8000) },
        )],
        vec![],
    );

    assert!(assemble_path(&matched, &network).unwrap().is_empty());
}
