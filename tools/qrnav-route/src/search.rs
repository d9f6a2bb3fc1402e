//! Best-first (A*) path search over a [`NavGraph`]
//!
//! The frontier is a binary heap of `(f, node)` entries. Improving a node's
//! cost pushes a fresh entry instead of decreasing a key; superseded entries
//! are recognized on pop by comparing their cost to the node's best known
//! cost and skipped.
//!
//! With an admissible heuristic the first time the goal is popped its cost is
//! final. The default indoor heuristic can overestimate, so for heuristics
//! that do not declare admissibility the first goal pop only fixes an
//! incumbent: the loop keeps draining the frontier, discarding every entry
//! whose cost already reaches the incumbent, and the goal is finalized once
//! nothing cheaper can remain. With non-negative edge weights the result is a
//! shortest route whatever the heuristic returns.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use qrnav_common::{suggest_identifier, Endpoint, Error, Result};
use serde::Serialize;

use crate::graph::NavGraph;
use crate::heuristic::{Heuristic, HeuristicConfig, IndoorHeuristic};
use crate::model::Waypoint;
use crate::observer::{SearchEvent, SearchObserver, SearchStats, TracingObserver};

/// Shortest route between two waypoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Waypoints from start to goal, both included
    pub path: Vec<Waypoint>,
    /// Sum of edge weights along `path`
    pub distance: f64,
    #[serde(skip)]
    pub stats: SearchStats,
}

impl Route {
    pub fn start(&self) -> Option<&Waypoint> {
        self.path.first()
    }

    pub fn goal(&self) -> Option<&Waypoint> {
        self.path.last()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.path.iter().map(|wp| wp.id.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    /// Cost at push time, compared with the node's best cost on pop
    g: f64,
    node: u32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap. Node indices follow identifier order,
        // so equal scores pop in ascending identifier order.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Path search engine bound to one graph snapshot
pub struct PathFinder<'g, H = IndoorHeuristic> {
    graph: &'g NavGraph,
    heuristic: H,
}

impl<'g> PathFinder<'g, IndoorHeuristic> {
    /// Engine using the indoor heuristic with default weights
    pub fn new(graph: &'g NavGraph) -> Self {
        Self::with_heuristic(graph, IndoorHeuristic::default())
    }

    pub fn with_config(graph: &'g NavGraph, config: HeuristicConfig) -> Self {
        Self::with_heuristic(graph, IndoorHeuristic::new(config))
    }
}

impl<'g, H: Heuristic> PathFinder<'g, H> {
    pub fn with_heuristic(graph: &'g NavGraph, heuristic: H) -> Self {
        Self { graph, heuristic }
    }

    pub fn graph(&self) -> &'g NavGraph {
        self.graph
    }

    /// Shortest route from `start` to `goal`, reporting to `tracing`
    pub fn find_path(&self, start: &str, goal: &str) -> Result<Route> {
        self.find_path_observed(start, goal, &mut TracingObserver)
    }

    /// Shortest route from `start` to `goal`, reporting to `observer`
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownNode`] if either identifier is not a routable node;
    ///   checked before any search work
    /// - [`Error::NoPath`] if the frontier drains without reaching the goal
    pub fn find_path_observed<O>(&self, start: &str, goal: &str, observer: &mut O) -> Result<Route>
    where
        O: SearchObserver + ?Sized,
    {
        let source = self.resolve(start, Endpoint::Start)?;
        let target = self.resolve(goal, Endpoint::Goal)?;

        observer.on_event(&SearchEvent::Started { start, goal });

        let graph = self.graph;
        let goal_wp = graph.waypoint(target);
        let admissible = self.heuristic.is_admissible();
        let n = graph.len();

        let mut stats = SearchStats::default();
        let mut g_score = vec![f64::INFINITY; n];
        let mut f_score = vec![f64::INFINITY; n];
        let mut predecessor: Vec<Option<u32>> = vec![None; n];
        let mut frontier = BinaryHeap::new();

        let t = target as usize;
        g_score[source as usize] = 0.0;
        stats.heuristic_calls += 1;
        f_score[source as usize] = self.heuristic.estimate(graph.waypoint(source), goal_wp);
        frontier.push(FrontierEntry {
            f: f_score[source as usize],
            g: 0.0,
            node: source,
        });
        stats.pushes += 1;

        while let Some(current) = frontier.pop() {
            stats.pops += 1;
            let u = current.node as usize;
            let node_id = graph.waypoint(current.node).id.as_str();

            if current.g > g_score[u] {
                stats.stale_pops += 1;
                observer.on_event(&SearchEvent::StaleSkipped {
                    node: node_id,
                    g: current.g,
                });
                continue;
            }

            if u == t {
                observer.on_event(&SearchEvent::GoalReached { g: g_score[t] });
                if admissible {
                    break;
                }
                // Expanding the goal cannot shorten a route to it
                continue;
            }

            // Non-negative weights: nothing reached from here can beat the incumbent
            if current.g >= g_score[t] {
                stats.pruned_pops += 1;
                observer.on_event(&SearchEvent::Pruned {
                    node: node_id,
                    g: current.g,
                });
                continue;
            }

            stats.expansions += 1;
            observer.on_event(&SearchEvent::Settled {
                node: node_id,
                g: current.g,
                f: current.f,
            });

            for &(neighbor, weight) in graph.adjacent(current.node) {
                stats.edges_explored += 1;
                let v = neighbor as usize;
                let tentative = g_score[u] + weight;

                if tentative < g_score[v] && tentative < g_score[t] {
                    stats.relaxations += 1;
                    predecessor[v] = Some(current.node);
                    g_score[v] = tentative;
                    stats.heuristic_calls += 1;
                    f_score[v] = tentative
                        + self
                            .heuristic
                            .estimate(graph.waypoint(neighbor), goal_wp);

                    frontier.push(FrontierEntry {
                        f: f_score[v],
                        g: tentative,
                        node: neighbor,
                    });
                    stats.pushes += 1;
                    observer.on_event(&SearchEvent::Relaxed {
                        from: node_id,
                        to: graph.waypoint(neighbor).id.as_str(),
                        g: tentative,
                        f: f_score[v],
                    });
                }
            }
        }

        if g_score[t].is_infinite() {
            observer.on_event(&SearchEvent::Finished {
                distance: None,
                stats,
            });
            return Err(Error::NoPath {
                start: start.to_string(),
                goal: goal.to_string(),
            });
        }

        let distance = g_score[t];
        let path = self.reconstruct(&predecessor, source, target);
        observer.on_event(&SearchEvent::Finished {
            distance: Some(distance),
            stats,
        });

        Ok(Route {
            path,
            distance,
            stats,
        })
    }

    fn resolve(&self, id: &str, role: Endpoint) -> Result<u32> {
        self.graph.index_of(id).ok_or_else(|| Error::UnknownNode {
            role,
            id: id.to_string(),
            suggestion: suggest_identifier(id, self.graph.ids()),
        })
    }

    fn reconstruct(&self, predecessor: &[Option<u32>], source: u32, target: u32) -> Vec<Waypoint> {
        let mut nodes = vec![target];
        let mut current = target;
        while current != source {
            match predecessor[current as usize] {
                Some(prev) => {
                    nodes.push(prev);
                    current = prev;
                }
                None => break,
            }
        }
        nodes.reverse();

        nodes
            .into_iter()
            .map(|ix| self.graph.waypoint(ix).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::ZeroHeuristic;
    use crate::observer::NoopObserver;
    use crate::model::{EdgeRecord, NodeRecord};

    fn line_graph() -> NavGraph {
        let nodes = vec![
            NodeRecord::new("A", 0.0, 0.0, "1F", "Main"),
            NodeRecord::new("B", 10.0, 0.0, "1F", "Main"),
            NodeRecord::new("C", 20.0, 0.0, "1F", "Main"),
        ];
        let edges = vec![EdgeRecord::new("A", "B", 10.0), EdgeRecord::new("B", "C", 10.0)];
        NavGraph::from_records(&nodes, &edges)
    }

    #[test]
    fn test_frontier_pops_lowest_f_then_lowest_id() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { f: 5.0, g: 0.0, node: 2 });
        heap.push(FrontierEntry { f: 1.0, g: 0.0, node: 7 });
        heap.push(FrontierEntry { f: 5.0, g: 0.0, node: 1 });
        heap.push(FrontierEntry { f: f64::INFINITY, g: 0.0, node: 0 });

        let order: Vec<u32> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![7, 1, 2, 0]);
    }

    #[test]
    fn test_line_route() {
        let graph = line_graph();
        let route = PathFinder::new(&graph).find_path("A", "C").unwrap();
        assert_eq!(route.ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(route.distance, 20.0);
        assert_eq!(route.start().unwrap().id, "A");
        assert_eq!(route.goal().unwrap().id, "C");
    }

    #[test]
    fn test_unknown_endpoints_fail_before_search() {
        let graph = line_graph();
        let finder = PathFinder::new(&graph);
        let mut events = 0usize;
        let mut count = |_: &SearchEvent<'_>| events += 1;

        let err = finder.find_path_observed("X", "C", &mut count).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownNode {
                role: Endpoint::Start,
                ..
            }
        ));

        let err = finder.find_path_observed("A", "Y", &mut count).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownNode {
                role: Endpoint::Goal,
                ..
            }
        ));
        assert_eq!(events, 0);
    }

    #[test]
    fn test_silent_search_matches_traced_search() {
        let graph = line_graph();
        let finder = PathFinder::new(&graph);
        let silent = finder
            .find_path_observed("C", "A", &mut NoopObserver)
            .unwrap();
        let traced = finder.find_path("C", "A").unwrap();
        assert_eq!(silent, traced);
        assert_eq!(silent.distance, 20.0);
    }

    #[test]
    fn test_stats_and_events_are_consistent() {
        let graph = line_graph();
        let finder = PathFinder::with_heuristic(&graph, ZeroHeuristic);
        let mut settled = Vec::new();
        let mut finished = None;
        let mut observer = |event: &SearchEvent<'_>| match *event {
            SearchEvent::Settled { node, .. } => settled.push(node.to_string()),
            SearchEvent::Finished { distance, stats } => finished = Some((distance, stats)),
            _ => {}
        };

        let route = finder.find_path_observed("A", "C", &mut observer).unwrap();
        assert_eq!(settled, vec!["A", "B"]);

        let (distance, stats) = finished.unwrap();
        assert_eq!(distance, Some(20.0));
        assert_eq!(stats, route.stats);
        assert_eq!(stats.expansions, 2);
        assert_eq!(stats.pushes, 3);
    }
}
