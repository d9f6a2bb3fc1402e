//! Remaining-cost estimates for the path search
//!
//! The indoor estimate treats the floor difference as a third spatial axis
//! scaled by `floor_weight` pixels per floor and adds a flat surcharge when the
//! buildings differ. It is tuned for plausible routes and may overestimate, so
//! it reports itself as not admissible and the engine searches accordingly.

use qrnav_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Location, Waypoint};

/// Pixels charged per floor of vertical separation
pub const DEFAULT_FLOOR_WEIGHT: f64 = 50.0;

/// Flat surcharge for crossing into another building
pub const DEFAULT_BUILDING_PENALTY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicConfig {
    pub floor_weight: f64,
    pub building_penalty: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            floor_weight: DEFAULT_FLOOR_WEIGHT,
            building_penalty: DEFAULT_BUILDING_PENALTY,
        }
    }
}

impl HeuristicConfig {
    /// Both terms must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("floor_weight", self.floor_weight),
            ("building_penalty", self.building_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "heuristic.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Estimate of the remaining cost from a node to the goal
pub trait Heuristic {
    fn estimate(&self, node: &Waypoint, goal: &Waypoint) -> f64;

    /// Whether `estimate` never exceeds the true remaining cost.
    ///
    /// When true the engine finalizes the route on the first goal pop;
    /// otherwise it keeps searching until no cheaper route can remain.
    fn is_admissible(&self) -> bool {
        false
    }
}

impl<F> Heuristic for F
where
    F: Fn(&Waypoint, &Waypoint) -> f64,
{
    fn estimate(&self, node: &Waypoint, goal: &Waypoint) -> f64 {
        self(node, goal)
    }
}

/// Floor difference between two labels, zero if either has no numeric level
pub fn floor_difference(a: &Location<'_>, b: &Location<'_>) -> f64 {
    match (a.floor.level(), b.floor.level()) {
        (Some(la), Some(lb)) => f64::from(la) - f64::from(lb),
        _ => 0.0,
    }
}

/// `sqrt(dx² + dy² + (floor_weight·Δfloor)²)` plus the building surcharge
pub fn indoor_distance(a: &Location<'_>, b: &Location<'_>, config: &HeuristicConfig) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = config.floor_weight * floor_difference(a, b);
    let spatial = (dx * dx + dy * dy + dz * dz).sqrt();

    if a.building != b.building {
        spatial + config.building_penalty
    } else {
        spatial
    }
}

/// Planar distance with floor and building penalties
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndoorHeuristic {
    config: HeuristicConfig,
}

impl IndoorHeuristic {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }
}

impl Heuristic for IndoorHeuristic {
    fn estimate(&self, node: &Waypoint, goal: &Waypoint) -> f64 {
        match (node.location(), goal.location()) {
            (Some(a), Some(b)) => indoor_distance(&a, &b, &self.config),
            // Unknown position: rank last, exact costs still drive the search
            _ => f64::INFINITY,
        }
    }
}

/// Always zero; turns the search into Dijkstra
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _node: &Waypoint, _goal: &Waypoint) -> f64 {
        0.0
    }

    fn is_admissible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRecord;

    fn wp(x: f64, y: f64, floor: &str, building: &str) -> Waypoint {
        Waypoint::from_record(&NodeRecord::new("N", x, y, floor, building)).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_planar_only_on_same_floor() {
        let h = IndoorHeuristic::default();
        let est = h.estimate(&wp(0.0, 0.0, "1F", "A"), &wp(30.0, 40.0, "1F", "A"));
        assert!(close(est, 50.0));
    }

    #[test]
    fn test_floor_difference_in_quadrature() {
        let h = IndoorHeuristic::default();
        // Two floors apart: dz = 100, planar 0
        let est = h.estimate(&wp(10.0, 10.0, "1F", "A"), &wp(10.0, 10.0, "3F", "A"));
        assert!(close(est, 100.0));

        // Planar (30, 40), one floor apart
        let est = h.estimate(&wp(0.0, 0.0, "2F", "A"), &wp(30.0, 40.0, "1F", "A"));
        assert!(close(est, (30.0f64 * 30.0 + 40.0 * 40.0 + 50.0 * 50.0).sqrt()));
    }

    #[test]
    fn test_building_penalty_is_flat() {
        let h = IndoorHeuristic::default();
        let est = h.estimate(&wp(0.0, 0.0, "1F", "A"), &wp(3.0, 4.0, "1F", "B"));
        assert!(close(est, 105.0));

        let est = h.estimate(&wp(0.0, 0.0, "1F", "A"), &wp(0.0, 0.0, "2F", "B"));
        assert!(close(est, 150.0));
    }

    #[test]
    fn test_unparseable_floor_counts_as_same_level() {
        let h = IndoorHeuristic::default();
        let est = h.estimate(&wp(0.0, 0.0, "Lobby", "A"), &wp(3.0, 4.0, "7F", "A"));
        assert!(close(est, 5.0));
    }

    #[test]
    fn test_basement_label_uses_digits_only() {
        let h = IndoorHeuristic::default();
        // "B1" parses as level 1, same as "1F"
        let est = h.estimate(&wp(0.0, 0.0, "B1", "A"), &wp(0.0, 0.0, "1F", "A"));
        assert!(close(est, 0.0));
    }

    #[test]
    fn test_missing_location_is_infinite() {
        let h = IndoorHeuristic::default();
        let mut node = wp(0.0, 0.0, "1F", "A");
        node.x = None;
        assert_eq!(h.estimate(&node, &wp(1.0, 1.0, "1F", "A")), f64::INFINITY);
        assert_eq!(h.estimate(&wp(1.0, 1.0, "1F", "A"), &node), f64::INFINITY);
    }

    #[test]
    fn test_custom_weights() {
        let h = IndoorHeuristic::new(HeuristicConfig {
            floor_weight: 10.0,
            building_penalty: 0.0,
        });
        let est = h.estimate(&wp(0.0, 0.0, "1F", "A"), &wp(0.0, 0.0, "4F", "B"));
        assert!(close(est, 30.0));
    }

    #[test]
    fn test_config_validation() {
        assert!(HeuristicConfig::default().validate().is_ok());
        let bad = HeuristicConfig {
            floor_weight: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = HeuristicConfig {
            building_penalty: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_admissibility_flags() {
        assert!(!IndoorHeuristic::default().is_admissible());
        assert!(ZeroHeuristic.is_admissible());
        let closure = |_: &Waypoint, _: &Waypoint| 1.0;
        assert!(!closure.is_admissible());
    }
}
