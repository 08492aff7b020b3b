//! State identity and canonical state-set naming.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Rendering of the empty state set (the deterministic dead state).
pub const EMPTY_SET: &str = "∅";

/// A state in an automaton.
///
/// States are plain labels: two states are equal iff their labels are equal,
/// and they order lexicographically by label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered, deduplicated set of states.
pub type StateSet = BTreeSet<State>;

/// Renders the canonical key of a state set: `{a,b,c}`, or `∅` when empty.
///
/// `BTreeSet` iteration is sorted, so equal sets always render identically.
pub fn canonical_key(set: &StateSet) -> String {
    if set.is_empty() {
        return EMPTY_SET.to_string();
    }
    let members: Vec<&str> = set.iter().map(State::as_str).collect();
    format!("{{{}}}", members.join(","))
}

/// Returns a state named `base` (or `base'`, `base''`, ...) not present in `taken`.
pub fn fresh_state(base: &str, taken: &StateSet) -> State {
    let mut candidate = State::new(base);
    while taken.contains(&candidate) {
        candidate = State(format!("{}'", candidate.0));
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_order_by_label() {
        let mut states: Vec<State> = vec!["2".into(), "10".into(), "1".into()];
        states.sort();
        let labels: Vec<&str> = states.iter().map(State::as_str).collect();
        assert_eq!(labels, vec!["1", "10", "2"]);
    }

    #[test]
    fn test_canonical_key_is_order_independent() {
        let a: StateSet = ["3", "1", "2"].into_iter().map(State::from).collect();
        let b: StateSet = ["2", "3", "1", "1"].into_iter().map(State::from).collect();
        assert_eq!(canonical_key(&a), "{1,2,3}");
        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn test_canonical_key_empty_set() {
        assert_eq!(canonical_key(&StateSet::new()), EMPTY_SET);
    }

    #[test]
    fn test_fresh_state_avoids_collisions() {
        let taken: StateSet = ["start", "start'"].into_iter().map(State::from).collect();
        assert_eq!(fresh_state("start", &taken).as_str(), "start''");
        assert_eq!(fresh_state("end", &taken).as_str(), "end");
    }
}
