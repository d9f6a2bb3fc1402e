//! Result structure handed back to the service layer
//!
//! Success: `{"path": [...], "distance": 42.0}`.
//! Failure: `{"path": [], "distance": null, "error": "..."}`.

use qrnav_common::{Error, Result};
use serde::Serialize;

use crate::itinerary::{Itinerary, TransitionKind};
use crate::model::{FloorLabel, Waypoint};
use crate::search::Route;

/// Next floor for a transition waypoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionTarget {
    pub building: String,
    pub floor: FloorLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathNode {
    #[serde(flatten)]
    pub waypoint: Waypoint,
    pub is_transition: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<TransitionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_to: Option<TransitionTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResponse {
    pub path: Vec<PathNode>,
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathResponse {
    pub fn success(route: &Route) -> Self {
        let itinerary = Itinerary::from_route(route);
        let mut path: Vec<PathNode> = route
            .path
            .iter()
            .map(|waypoint| PathNode {
                waypoint: waypoint.clone(),
                is_transition: false,
                transition_type: None,
                transition_to: None,
            })
            .collect();

        for leg in &itinerary.legs {
            if let (Some(transition), Some(last)) = (&leg.transition, leg.end.checked_sub(1)) {
                let node = &mut path[last];
                node.is_transition = true;
                node.transition_type = Some(transition.kind);
                node.transition_to = Some(TransitionTarget {
                    building: transition.building.clone(),
                    floor: transition.floor.clone(),
                });
            }
        }

        Self {
            path,
            distance: Some(route.distance),
            error: None,
        }
    }

    pub fn failure(error: &Error) -> Self {
        Self {
            path: Vec::new(),
            distance: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<&Result<Route>> for PathResponse {
    fn from(result: &Result<Route>) -> Self {
        match result {
            Ok(route) => PathResponse::success(route),
            Err(err) => PathResponse::failure(err),
        }
    }
}
