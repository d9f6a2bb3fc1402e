//! Per-floor legs of a route
//!
//! Clients draw one floor image at a time, so a route is split into maximal
//! runs of consecutive waypoints on the same floor of the same building. The
//! last waypoint of every leg except the final one is a transition: the
//! walker takes an elevator, stairs or a walkway to the next leg's floor.

use serde::Serialize;

use crate::model::{FloorLabel, NodeKind, Waypoint};
use crate::search::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Elevator,
    Stairs,
    /// Building change without a vertical connector
    Walkway,
    Other,
}

impl TransitionKind {
    fn between(from: &Waypoint, to: &Waypoint) -> Self {
        let kinds = [from.kind, to.kind];
        if kinds.contains(&NodeKind::Elevator) {
            TransitionKind::Elevator
        } else if kinds.contains(&NodeKind::Stairs) {
            TransitionKind::Stairs
        } else if from.building != to.building {
            TransitionKind::Walkway
        } else {
            TransitionKind::Other
        }
    }
}

/// Where a transition leads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    /// Waypoint where the leg ends
    pub at: String,
    pub kind: TransitionKind,
    pub building: String,
    pub floor: FloorLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub building: String,
    pub floor: FloorLabel,
    /// Index range into the route path, end exclusive
    pub start: usize,
    pub end: usize,
    /// Summed pixel distance between consecutive waypoints of the leg
    pub length: f64,
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
}

impl Itinerary {
    pub fn from_route(route: &Route) -> Self {
        Self::from_path(&route.path)
    }

    pub fn from_path(path: &[Waypoint]) -> Self {
        let mut legs: Vec<Leg> = Vec::new();
        let mut start = 0;

        for i in 1..=path.len() {
            let boundary = i == path.len() || !path[i].same_floor(&path[i - 1]);
            if !boundary {
                continue;
            }

            let first = &path[start];
            let transition = path.get(i).map(|next| Transition {
                at: path[i - 1].id.clone(),
                kind: TransitionKind::between(&path[i - 1], next),
                building: next.building.clone(),
                floor: next.floor.clone(),
            });
            legs.push(Leg {
                building: first.building.clone(),
                floor: first.floor.clone(),
                start,
                end: i,
                length: planar_length(&path[start..i]),
                transition,
            });
            start = i;
        }

        Self { legs }
    }

    /// Leg containing the waypoint at `index` of the route path
    pub fn leg_of(&self, index: usize) -> Option<&Leg> {
        self.legs
            .iter()
            .find(|leg| (leg.start..leg.end).contains(&index))
    }

    /// Number of floor or building changes along the route
    pub fn transitions(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }
}

fn planar_length(nodes: &[Waypoint]) -> f64 {
    nodes
        .windows(2)
        .filter_map(|pair| {
            let a = pair[0].location()?;
            let b = pair[1].location()?;
            Some(a.planar_distance(&b))
        })
        .sum()
}
