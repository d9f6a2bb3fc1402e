//! Shortest indoor routes over QR waypoint graphs
//!
//! A snapshot of node and edge records is turned into a [`NavGraph`], which
//! the [`PathFinder`] searches with an indoor heuristic aware of floors and
//! buildings. Routes can be split into per-floor legs with [`Itinerary`] and
//! returned to clients as a [`PathResponse`].

pub mod config;
pub mod graph;
pub mod heuristic;
pub mod itinerary;
pub mod model;
pub mod observer;
pub mod response;
pub mod search;
pub mod snapshot;

pub use config::NavConfig;
pub use graph::{BuildStats, NavGraph};
pub use heuristic::{Heuristic, HeuristicConfig, IndoorHeuristic, ZeroHeuristic};
pub use itinerary::{Itinerary, Leg, Transition, TransitionKind};
pub use model::{parse_floor_level, EdgeRecord, FloorLabel, Location, NodeKind, NodeRecord, Waypoint};
pub use observer::{NoopObserver, SearchEvent, SearchObserver, SearchStats, TracingObserver};
pub use qrnav_common::{Endpoint, Error, Result};
pub use response::PathResponse;
pub use search::{PathFinder, Route};
pub use snapshot::{NodeQuery, Snapshot};

/// Build a graph from `nodes` and `edges` and search it once with the default heuristic
pub fn find_shortest_path<'a, N, E>(start: &str, goal: &str, nodes: N, edges: E) -> Result<Route>
where
    N: IntoIterator<Item = &'a NodeRecord>,
    E: IntoIterator<Item = &'a EdgeRecord>,
{
    let graph = NavGraph::from_records(nodes, edges);
    PathFinder::new(&graph).find_path(start, goal)
}
