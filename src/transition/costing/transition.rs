use geo::{Bearing, Distance, Haversine, Point};

use crate::network::NetworkError;
use crate::transition::costing::{TransitionContext, TransitionStrategy};

/// The default transition model.
///
/// Routing: the ratio `min(gc, routed) / max(gc, routed)` between the
/// great-circle distance travelled by the observations and the network
/// shortest-path distance between the candidates. Bounded in `(0, 1]`:
/// `1` when the network path agrees with straight-line travel, decaying
/// as it diverges, `0` when no connecting path exists.
///
/// Heading: `cos Δθ` between the candidate-to-candidate bearing and the
/// observation-to-observation bearing, clamped at `0` beyond 90°.
///
/// Both tolerate zero-distance steps: two zero distances are in perfect
/// agreement, and a bearing over a zero-length vector is vacuous
/// evidence, scored `1` so the remaining components decide.
pub struct RoutedRatio;

impl RoutedRatio {
    fn ratio(a: f64, b: f64) -> f64 {
        let upper = a.max(b);
        if upper == 0.0 {
            return 1.0;
        }

        a.min(b) / upper
    }

    fn bearing(from: Point<f64>, to: Point<f64>) -> Option<f64> {
        (from != to).then(|| Haversine.bearing(from, to))
    }
}

impl TransitionStrategy for RoutedRatio {
    fn routing(&self, context: &TransitionContext) -> Result<f64, NetworkError> {
        let observed = Haversine.distance(
            context.previous_observation.position,
            context.current_observation.position,
        );

        let routed = context
            .network
            .shortest_path_distance(&context.source.position, &context.target.position)?;

        Ok(routed.map_or(0.0, |routed| Self::ratio(observed, routed)))
    }

    fn heading(&self, context: &TransitionContext) -> f64 {
        let observed = Self::bearing(
            context.previous_observation.position,
            context.current_observation.position,
        );
        let travelled = Self::bearing(context.source.position, context.target.position);

        let (Some(observed), Some(travelled)) = (observed, travelled) else {
            return 1.0;
        };

        let mut delta = (observed - travelled).abs();
        if delta > 180.0 {
            delta = 360.0 - delta;
        }

        delta.to_radians().cos().max(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ratio_is_symmetric_and_bounded() {
        assert_relative_eq!(RoutedRatio::ratio(100.0, 130.0), 100.0 / 130.0);
        assert_relative_eq!(RoutedRatio::ratio(130.0, 100.0), 100.0 / 130.0);
        assert_relative_eq!(RoutedRatio::ratio(250.0, 250.0), 1.0);
    }

    #[test]
    fn zero_distances_agree() {
        assert_relative_eq!(RoutedRatio::ratio(0.0, 0.0), 1.0);
        assert_relative_eq!(RoutedRatio::ratio(0.0, 50.0), 0.0);
    }

    #[test]
    fn bearing_of_zero_length_vector_is_undefined() {
        let point = Point::new(151.0, -33.8);
        assert!(RoutedRatio::bearing(point, point).is_none());
        assert!(RoutedRatio::bearing(point, Point::new(151.1, -33.8)).is_some());
    }
}
