//! Location model: node and edge records, routable waypoints, floor labels
//!
//! Records mirror what the node/edge store hands over. Coordinates are pixels
//! on the named floor's image, origin top-left, so they are only comparable
//! between nodes on the same floor of the same building.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node category as tagged in the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    /// QR code spot, the usual start of a route
    Qr,
    Junction,
    /// Point of interest (room, desk, facility)
    Poi,
    Elevator,
    Stairs,
    #[default]
    Etc,
}

/// Free-form floor token such as "1F", "B1" or "12"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorLabel(String);

impl FloorLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric level of this floor, see [`parse_floor_level`]
    pub fn level(&self) -> Option<i32> {
        parse_floor_level(&self.0)
    }
}

impl fmt::Display for FloorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FloorLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Extract the leading numeric component of a floor label
///
/// Letters are skipped and the first run of ASCII digits is parsed:
/// "1F" -> 1, "B1" -> 1, "12" -> 12, "3F-east" -> 3. Labels without digits
/// (or with a run too long for `i32`) yield `None`.
pub fn parse_floor_level(label: &str) -> Option<i32> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Node as supplied by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Routable identifier (QR payload). Nodes without one are not routable.
    #[serde(default, alias = "identifier")]
    pub qr_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub floor: FloorLabel,
    #[serde(default)]
    pub building: String,
    #[serde(default, alias = "x")]
    pub pixel_x: Option<f64>,
    #[serde(default, alias = "y")]
    pub pixel_y: Option<f64>,
    #[serde(default)]
    pub node_type: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeRecord {
    /// Minimal record with coordinates, kind `ETC` and no name
    pub fn new(
        qr_id: impl Into<String>,
        x: f64,
        y: f64,
        floor: impl Into<FloorLabel>,
        building: impl Into<String>,
    ) -> Self {
        Self {
            qr_id: Some(qr_id.into()),
            name: String::new(),
            floor: floor.into(),
            building: building.into(),
            pixel_x: Some(x),
            pixel_y: Some(y),
            node_type: NodeKind::Etc,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.node_type = kind;
        self
    }

    /// Routable identifier, treating an empty string as absent
    pub fn routable_id(&self) -> Option<&str> {
        self.qr_id.as_deref().filter(|id| !id.is_empty())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Undirected weighted connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(default, alias = "start_identifier")]
    pub start: Option<String>,
    #[serde(default, alias = "end_identifier")]
    pub end: Option<String>,
    /// Traversal cost, usually the pixel distance. Must be non-negative.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl EdgeRecord {
    pub fn new(start: impl Into<String>, end: impl Into<String>, weight: f64) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            weight,
        }
    }
}

/// Routable node: identifier plus the attributes carried into routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "node_type", default)]
    pub kind: NodeKind,
    pub floor: FloorLabel,
    pub building: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Waypoint {
    /// Convert a record; `None` when the record has no routable identifier
    pub fn from_record(record: &NodeRecord) -> Option<Self> {
        let id = record.routable_id()?;
        Some(Self {
            id: id.to_string(),
            name: record.name.clone(),
            kind: record.node_type,
            floor: record.floor.clone(),
            building: record.building.clone(),
            x: record.pixel_x,
            y: record.pixel_y,
        })
    }

    /// Coordinate view; `None` when either pixel coordinate is missing
    pub fn location(&self) -> Option<Location<'_>> {
        Some(Location {
            x: self.x?,
            y: self.y?,
            floor: &self.floor,
            building: &self.building,
        })
    }

    /// True when both waypoints sit on the same floor of the same building
    pub fn same_floor(&self, other: &Waypoint) -> bool {
        self.building == other.building && self.floor == other.floor
    }
}

/// Position of a waypoint: pixel coordinate on a named floor of a building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location<'a> {
    pub x: f64,
    pub y: f64,
    pub floor: &'a FloorLabel,
    pub building: &'a str,
}

impl Location<'_> {
    /// Straight-line pixel distance, ignoring floor and building
    pub fn planar_distance(&self, other: &Location<'_>) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_floor_level() {
        assert_eq!(parse_floor_level("1F"), Some(1));
        assert_eq!(parse_floor_level("B1"), Some(1));
        assert_eq!(parse_floor_level("12"), Some(12));
        assert_eq!(parse_floor_level("3F-east"), Some(3));
        assert_eq!(parse_floor_level("A2B3"), Some(2));
        assert_eq!(parse_floor_level("Lobby"), None);
        assert_eq!(parse_floor_level(""), None);
        assert_eq!(parse_floor_level("99999999999F"), None);
    }

    #[test]
    fn test_routable_id() {
        let mut record = NodeRecord::new("QR1", 0.0, 0.0, "1F", "A");
        assert_eq!(record.routable_id(), Some("QR1"));

        record.qr_id = Some(String::new());
        assert_eq!(record.routable_id(), None);
        assert!(Waypoint::from_record(&record).is_none());

        record.qr_id = None;
        assert_eq!(record.routable_id(), None);
    }

    #[test]
    fn test_node_record_from_store_json() {
        let json = r#"{
            "qr_id": "QR_ENTRANCE_1F",
            "name": "Main entrance",
            "floor": "1F",
            "building": "Engineering",
            "pixel_x": 120,
            "pixel_y": 340,
            "node_type": "QR"
        }"#;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.routable_id(), Some("QR_ENTRANCE_1F"));
        assert_eq!(record.node_type, NodeKind::Qr);
        assert_eq!(record.floor.level(), Some(1));
        assert_eq!(record.pixel_x, Some(120.0));

        // Junctions often have no QR payload at all
        let json = r#"{"name": "corridor", "floor": "2F", "pixel_x": 1, "pixel_y": 2}"#;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.routable_id(), None);
        assert_eq!(record.node_type, NodeKind::Etc);
    }

    #[test]
    fn test_edge_record_defaults() {
        let edge: EdgeRecord =
            serde_json::from_str(r#"{"start_identifier": "A", "end": "B"}"#).unwrap();
        assert_eq!(edge.start.as_deref(), Some("A"));
        assert_eq!(edge.end.as_deref(), Some("B"));
        assert_eq!(edge.weight, 1.0);
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let mut wp = Waypoint::from_record(&NodeRecord::new("A", 3.0, 4.0, "1F", "X")).unwrap();
        let origin = Waypoint::from_record(&NodeRecord::new("O", 0.0, 0.0, "1F", "X")).unwrap();
        let d = wp
            .location()
            .unwrap()
            .planar_distance(&origin.location().unwrap());
        assert!((d - 5.0).abs() < 1e-9);

        wp.y = None;
        assert!(wp.location().is_none());
    }
}
