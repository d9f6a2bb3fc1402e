//! Error types and utilities for the qrnav toolkit
//!
//! Provides the routing error taxonomy and fuzzy matching of routable
//! identifiers, so a mistyped QR payload can be answered with a suggestion.

use std::fmt;
use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

/// Which end of a route request an identifier was given for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Minimum combined similarity for an identifier suggestion.
///
/// QR payloads are short and share long prefixes ("QR_ENTRANCE_1F",
/// "QR_ENTRANCE_2F"), so the threshold is higher than for free-form names.
const MIN_SUGGESTION_SCORE: f64 = 0.75;

fn similarity(input: &str, candidate: &str) -> f64 {
    // 70% JW + 30% Lev: typos in scanned or hand-entered payloads are mostly
    // transpositions and dropped characters near the end.
    let jw = jaro_winkler(input, candidate);
    let lev = normalized_levenshtein(input, candidate);
    let mut score = jw * 0.7 + lev * 0.3;

    // Same trailing floor token ("..._1F") is a strong signal.
    let input_tail = input.rsplit(['_', '-']).next().unwrap_or(input);
    let candidate_tail = candidate.rsplit(['_', '-']).next().unwrap_or(candidate);
    if input_tail.len() >= 2 && input_tail == candidate_tail {
        score += 0.05;
    }

    score
}

/// Suggest the closest known identifier for an unknown one
///
/// Matching is case-insensitive. A candidate equal to `input` ignoring case is
/// returned as-is (the caller most likely typed the wrong case); an exact match
/// returns `None` since there is nothing to correct.
pub fn suggest_identifier<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    if input_lower.is_empty() {
        return None;
    }

    let mut best: Option<(&str, f64)> = None;

    for candidate in candidates {
        if candidate == input {
            return None;
        }

        let candidate_lower = candidate.to_lowercase();
        if candidate_lower == input_lower {
            return Some(candidate.to_string());
        }

        let score = similarity(&input_lower, &candidate_lower);
        if score < MIN_SUGGESTION_SCORE {
            continue;
        }

        // Ties keep the lexicographically smaller identifier so suggestions do
        // not depend on map iteration order.
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                score > current_score || (score == current_score && candidate < current)
            }
        };
        if better {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate.to_string())
}

/// Main error type for qrnav operations
#[derive(Debug, Error)]
pub enum Error {
    /// Start or goal identifier is not a routable node of the graph
    #[error("{role} node '{id}' not found{}", suggestion_hint(.suggestion))]
    UnknownNode {
        role: Endpoint,
        id: String,
        suggestion: Option<String>,
    },

    /// Both endpoints exist but no walk connects them
    #[error("no route exists from '{start}' to '{goal}'")]
    NoPath { start: String, goal: String },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be decoded
    #[error("invalid snapshot: {0}")]
    Json(String),

    /// Configuration could not be decoded or is out of range
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// True for the fail-fast lookup failure, as opposed to an exhausted search
    pub fn is_unknown_node(&self) -> bool {
        matches!(self, Error::UnknownNode { .. })
    }

    /// True when the search ran to completion without reaching the goal
    pub fn is_no_path(&self) -> bool {
        matches!(self, Error::NoPath { .. })
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

/// Convenience result type for qrnav operations
pub type Result<T> = std::result::Result<T, Error>;
