//! Observability hook for the search loop
//!
//! The engine reports what it does through [`SearchObserver`] instead of
//! printing, so instrumentation stays out of the algorithm's control flow.

/// Counters for one search, returned with the route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier entries popped, stale ones included
    pub pops: usize,
    /// Popped entries whose cost was superseded by a later push
    pub stale_pops: usize,
    /// Popped entries discarded because they cannot beat the best goal cost
    pub pruned_pops: usize,
    /// Nodes expanded (neighbors examined)
    pub expansions: usize,
    /// Edges examined from expanded nodes
    pub edges_explored: usize,
    /// Edges that improved a neighbor's best known cost
    pub relaxations: usize,
    pub heuristic_calls: usize,
    pub pushes: usize,
}

/// Something the search loop did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchEvent<'a> {
    Started { start: &'a str, goal: &'a str },
    /// Node popped with its current best cost and about to be expanded
    Settled { node: &'a str, g: f64, f: f64 },
    StaleSkipped { node: &'a str, g: f64 },
    Pruned { node: &'a str, g: f64 },
    Relaxed { from: &'a str, to: &'a str, g: f64, f: f64 },
    /// Goal popped; `g` is the cost of the best route found so far
    GoalReached { g: f64 },
    Finished { distance: Option<f64>, stats: SearchStats },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: &SearchEvent<'_>);
}

/// Discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&mut self, _event: &SearchEvent<'_>) {}
}

/// Forwards events to `tracing`: per-node events at trace level, start and
/// finish at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        match *event {
            SearchEvent::Started { start, goal } => {
                tracing::debug!(start, goal, "search started");
            }
            SearchEvent::Settled { node, g, f } => {
                tracing::trace!(node, g, f, "settled");
            }
            SearchEvent::StaleSkipped { node, g } => {
                tracing::trace!(node, g, "stale frontier entry");
            }
            SearchEvent::Pruned { node, g } => {
                tracing::trace!(node, g, "pruned, cannot beat best goal cost");
            }
            SearchEvent::Relaxed { from, to, g, f } => {
                tracing::trace!(from, to, g, f, "relaxed");
            }
            SearchEvent::GoalReached { g } => {
                tracing::trace!(g, "goal reached");
            }
            SearchEvent::Finished { distance, stats } => {
                tracing::debug!(
                    ?distance,
                    pops = stats.pops,
                    stale_pops = stats.stale_pops,
                    pruned_pops = stats.pruned_pops,
                    expansions = stats.expansions,
                    relaxations = stats.relaxations,
                    heuristic_calls = stats.heuristic_calls,
                    "search finished"
                );
            }
        }
    }
}

impl<F> SearchObserver for F
where
    F: FnMut(&SearchEvent<'_>),
{
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        self(event)
    }
}
