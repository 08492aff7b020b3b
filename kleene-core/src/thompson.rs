//! Thompson construction: regular expression to epsilon automaton.
//!
//! Each sub-expression becomes a fragment numbered with private integer
//! handles. Every fragment has its initial state at handle `0` and its single
//! accepting state at handle `size - 1`; the initial state has no incoming
//! moves and the accepting state no outgoing moves. Combining two fragments
//! relabels their handles into one range first, so states of independently
//! built fragments can never collide.

use crate::automaton::Automaton;
use crate::regex::{Atom, RegularExpression};
use crate::state::{State, StateSet};
use crate::symbol::{Label, Symbol};
use crate::transition::Transition;
use std::collections::BTreeSet;

type Handle = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Move {
    from: Handle,
    symbol: Option<Symbol>,
    to: Handle,
}

#[derive(Debug, Clone)]
struct Fragment {
    size: Handle,
    moves: Vec<Move>,
}

impl Fragment {
    fn accepting(&self) -> Handle {
        self.size - 1
    }

    fn atom(symbol: Option<Symbol>) -> Self {
        Self {
            size: 2,
            moves: vec![Move {
                from: 0,
                symbol,
                to: 1,
            }],
        }
    }

    /// Rewrites every handle through `map`.
    fn relabel(self, map: impl Fn(Handle) -> Handle) -> Vec<Move> {
        self.moves
            .into_iter()
            .map(|m| Move {
                from: map(m.from),
                symbol: m.symbol,
                to: map(m.to),
            })
            .collect()
    }

    /// Shares the initial state and merges the two accepting states into one.
    fn union(a: Fragment, b: Fragment) -> Self {
        let size = a.size + b.size - 2;
        let accepting = size - 1;

        let a_accepting = a.accepting();
        let b_accepting = b.accepting();
        // `a` keeps its interior handles; `b`'s interior follows them.
        let b_offset = a.size - 2;

        let mut moves = a.relabel(|h| if h == a_accepting { accepting } else { h });
        moves.extend(b.relabel(|h| match h {
            0 => 0,
            h if h == b_accepting => accepting,
            h => h + b_offset,
        }));

        Self { size, moves }
    }

    /// Merges `b`'s initial state into `a`'s accepting state.
    fn concatenation(a: Fragment, b: Fragment) -> Self {
        let offset = a.accepting();
        let size = a.size + b.size - 1;

        let mut moves = a.moves;
        moves.extend(b.relabel(|h| h + offset));

        Self { size, moves }
    }

    /// Wraps `a` between a new initial and a new accepting state.
    fn star(a: Fragment) -> Self {
        let size = a.size + 2;
        let inner_initial = 1;
        let inner_accepting = a.size;
        let accepting = size - 1;

        let mut moves = a.relabel(|h| h + 1);
        moves.extend([
            Move {
                from: 0,
                symbol: None,
                to: inner_initial,
            },
            Move {
                from: inner_accepting,
                symbol: None,
                to: inner_initial,
            },
            Move {
                from: inner_initial,
                symbol: None,
                to: inner_accepting,
            },
            Move {
                from: inner_accepting,
                symbol: None,
                to: accepting,
            },
        ]);

        Self { size, moves }
    }
}

fn fragment(re: &RegularExpression) -> Fragment {
    let fragment = if let Some(inner) = re.star_operand() {
        Fragment::star(fragment(inner))
    } else if let Some((a, b)) = re.union_operands() {
        Fragment::union(fragment(a), fragment(b))
    } else if let Some((a, b)) = re.concatenation_operands() {
        Fragment::concatenation(fragment(a), fragment(b))
    } else {
        match re.atom() {
            Some(Atom::Symbol(s)) => Fragment::atom(Some(s)),
            _ => Fragment::atom(None),
        }
    };
    tracing::trace!(
        "fragment for '{}': {} states, {} moves",
        re,
        fragment.size,
        fragment.moves.len()
    );
    fragment
}

fn state_name(handle: Handle) -> State {
    State((handle + 1).to_string())
}

/// Builds an epsilon automaton for `re` with states named `1..=n`, initial
/// state `1` and the single accepting state `n`.
pub fn build(re: &RegularExpression) -> Automaton {
    let fragment = fragment(re);

    let states: StateSet = (0..fragment.size).map(state_name).collect();
    let initial = state_name(0);
    let accepting = StateSet::from([state_name(fragment.accepting())]);
    let transitions: BTreeSet<Transition> = fragment
        .moves
        .iter()
        .map(|m| {
            let label = m.symbol.map(Label::Symbol).unwrap_or(Label::Epsilon);
            Transition::new(state_name(m.from), label, state_name(m.to))
        })
        .collect();

    tracing::debug!(
        "thompson construction for '{}': {} states, {} transitions",
        re,
        states.len(),
        transitions.len()
    );

    Automaton::from_parts(states, initial, accepting, transitions, re.alphabet())
}
