//! Input primitives: observations and the trajectory they form.

use chrono::{DateTime, Utc};
use geo::{LineString, Point};

use crate::transition::MatchError;

/// A single positional sample within the input trajectory.
///
/// Immutable once constructed. The optional timestamp is carried for the
/// caller's benefit; the matcher itself derives direction purely from
/// sequence order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub position: Point<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(position: Point<f64>) -> Self {
        Self {
            position,
            timestamp: None,
        }
    }

    pub fn at(position: Point<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            position,
            timestamp: Some(timestamp),
        }
    }
}

impl From<Point<f64>> for Observation {
    fn from(position: Point<f64>) -> Self {
        Observation::new(position)
    }
}

/// An ordered, non-empty sequence of [`Observation`]s.
///
/// Order is semantically meaningful: it defines the direction of travel.
/// Consecutive observations at identical positions are permitted; the
/// probability model tolerates zero-distance steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    observations: Vec<Observation>,
}

impl Trajectory {
    pub fn new(observations: Vec<Observation>) -> Result<Self, MatchError> {
        if observations.is_empty() {
            return Err(MatchError::EmptyTrajectory);
        }

        Ok(Self { observations })
    }

    /// Builds a trajectory from bare linestring geometry.
    pub fn from_linestring(linestring: LineString<f64>) -> Result<Self, MatchError> {
        Trajectory::new(
            linestring
                .into_points()
                .into_iter()
                .map(Observation::new)
                .collect(),
        )
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false: empty trajectories are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::wkt;

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Trajectory::new(vec![]),
            Err(MatchError::EmptyTrajectory)
        ));
    }

    #[test]
    fn preserves_order() {
        let trajectory =
            Trajectory::from_linestring(wkt! { LINESTRING (0.0 0.0, 1.0 0.0, 1.0 1.0) }).unwrap();

        assert_eq!(trajectory.len(), 3);
        assert_eq!(
            trajectory.observations()[1].position,
            wkt! { POINT (1.0 0.0) }
        );
    }
}
