//! Graph snapshot: location lookup and adjacency built from flat records
//!
//! Identifiers are interned into dense `u32` indices assigned in ascending
//! identifier order, so index order and identifier order agree. The search
//! engine relies on this for its deterministic tie-break.

use crate::model::{EdgeRecord, Location, NodeRecord, Waypoint};
use rustc_hash::FxHashMap;

/// Counters collected while building a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Node records skipped for lack of a routable identifier
    pub skipped_nodes: usize,
    /// Records that repeated an identifier already seen
    pub duplicate_ids: usize,
    /// Undirected edges materialized in both directions
    pub edges: usize,
    /// Edges dropped because an endpoint is missing or unknown
    pub dropped_edges: usize,
}

/// Immutable routing graph for one search request
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    waypoints: Vec<Waypoint>,
    index: FxHashMap<String, u32>,
    adjacency: Vec<Vec<(u32, f64)>>,
    stats: BuildStats,
}

impl NavGraph {
    /// Build the location and adjacency lookups from node and edge records
    pub fn from_records<'a, N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'a NodeRecord>,
        E: IntoIterator<Item = &'a EdgeRecord>,
    {
        let mut stats = BuildStats::default();
        let mut by_id: FxHashMap<String, Waypoint> = FxHashMap::default();

        for record in nodes {
            let Some(waypoint) = Waypoint::from_record(record) else {
                stats.skipped_nodes += 1;
                continue;
            };
            if let Some(previous) = by_id.insert(waypoint.id.clone(), waypoint) {
                stats.duplicate_ids += 1;
                tracing::warn!(id = %previous.id, "duplicate routable identifier, keeping last record");
            }
        }

        let mut waypoints: Vec<Waypoint> = by_id.into_values().collect();
        waypoints.sort_by(|a, b| a.id.cmp(&b.id));

        let index: FxHashMap<String, u32> = waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| (wp.id.clone(), i as u32))
            .collect();

        // Every routable node is known, even with no edges
        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); waypoints.len()];

        for edge in edges {
            let endpoints = (
                edge.start.as_deref().and_then(|id| index.get(id)),
                edge.end.as_deref().and_then(|id| index.get(id)),
            );
            let (Some(&a), Some(&b)) = endpoints else {
                stats.dropped_edges += 1;
                tracing::debug!(
                    start = ?edge.start,
                    end = ?edge.end,
                    "dropping edge with missing or unknown endpoint"
                );
                continue;
            };
            adjacency[a as usize].push((b, edge.weight));
            adjacency[b as usize].push((a, edge.weight));
            stats.edges += 1;
        }

        let graph = Self {
            waypoints,
            index,
            adjacency,
            stats,
        };

        if graph.has_negative_weights() {
            tracing::warn!("graph contains negative edge weights, shortest paths are not guaranteed");
        }
        tracing::debug!(
            nodes = graph.len(),
            edges = stats.edges,
            skipped_nodes = stats.skipped_nodes,
            dropped_edges = stats.dropped_edges,
            "built navigation graph"
        );

        graph
    }

    /// Number of routable nodes
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Routable identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.waypoints.iter().map(|wp| wp.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Waypoint> {
        self.index_of(id).map(|ix| self.waypoint(ix))
    }

    /// Location lookup; `None` for unknown identifiers and for nodes lacking coordinates
    pub fn location(&self, id: &str) -> Option<Location<'_>> {
        self.get(id).and_then(Waypoint::location)
    }

    /// Adjacency lookup as `(neighbor, weight)` pairs, `None` for unknown identifiers
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let ix = self.index_of(id)?;
        Some(
            self.adjacent(ix)
                .iter()
                .map(move |&(n, w)| (self.waypoint(n).id.as_str(), w)),
        )
    }

    /// True if any edge would break the non-negative weight precondition of the search
    pub fn has_negative_weights(&self) -> bool {
        self.adjacency
            .iter()
            .flatten()
            .any(|&(_, weight)| weight < 0.0)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<u32> {
        self.index.get(id).copied()
    }

    pub(crate) fn waypoint(&self, ix: u32) -> &Waypoint {
        &self.waypoints[ix as usize]
    }

    pub(crate) fn adjacent(&self, ix: u32) -> &[(u32, f64)] {
        &self.adjacency[ix as usize]
    }
}
