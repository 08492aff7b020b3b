//! Labeled edges between states.

use crate::state::State;
use crate::symbol::Label;
use std::cmp::Ordering;
use std::fmt;

/// A transition `from --label--> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: State,
    pub label: Label,
    pub to: State,
}

impl Transition {
    pub fn new(from: impl Into<State>, label: impl Into<Label>, to: impl Into<State>) -> Self {
        Self {
            from: from.into(),
            label: label.into(),
            to: to.into(),
        }
    }

    /// Creates an epsilon move.
    pub fn epsilon(from: impl Into<State>, to: impl Into<State>) -> Self {
        Self::new(from, Label::Epsilon, to)
    }

    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Returns a copy with every occurrence of `old` replaced by `new`.
    pub fn renamed(&self, old: &State, new: &State) -> Self {
        let swap = |s: &State| if s == old { new.clone() } else { s.clone() };
        Self {
            from: swap(&self.from),
            label: self.label.clone(),
            to: swap(&self.to),
        }
    }
}

// Ordered by (from, to, label) so that the edges leaving a state and
// connecting a given pair are adjacent in a `BTreeSet`.
impl Ord for Transition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.to.cmp(&other.to))
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Transition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.from, self.label, self.to)
    }
}
