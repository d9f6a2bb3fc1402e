//! Node/edge snapshot handed over by the record store
//!
//! The snapshot is plain data: node and edge records as JSON. Lookups here
//! (by QR payload, by name) are what the kiosk and mobile clients use to pick
//! the start and destination before asking for a route.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use qrnav_common::Result;
use serde::{Deserialize, Serialize};

use crate::graph::NavGraph;
use crate::model::{EdgeRecord, NodeRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Filter for [`Snapshot::search`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeQuery<'a> {
    /// Case-insensitive substring of the node name; empty matches everything
    pub name: Option<&'a str>,
    pub building: Option<&'a str>,
    pub floor: Option<&'a str>,
}

impl Snapshot {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        tracing::debug!(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Build the routing graph for one search request
    pub fn graph(&self) -> NavGraph {
        NavGraph::from_records(&self.nodes, &self.edges)
    }

    /// Node whose routable identifier is exactly `qr_id`
    pub fn node_by_qr_id(&self, qr_id: &str) -> Option<&NodeRecord> {
        self.nodes
            .iter()
            .find(|node| node.routable_id() == Some(qr_id))
    }

    /// Nodes matching `query`, in snapshot order
    pub fn search(&self, query: &NodeQuery<'_>) -> Vec<&NodeRecord> {
        let needle = query
            .name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.nodes
            .iter()
            .filter(|node| match &needle {
                Some(needle) => node.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter(|node| query.building.map_or(true, |b| node.building == b))
            .filter(|node| query.floor.map_or(true, |f| node.floor.as_str() == f))
            .collect()
    }
}
