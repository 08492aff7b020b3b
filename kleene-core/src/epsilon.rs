//! Epsilon elimination.

use crate::automaton::Automaton;
use crate::state::{State, StateSet};
use crate::transition::Transition;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Computes the epsilon closure of every state with one breadth-first search
/// per state. Each closure contains the state itself.
pub fn epsilon_closures(fa: &Automaton) -> BTreeMap<State, StateSet> {
    let mut successors: BTreeMap<&State, Vec<&State>> = BTreeMap::new();
    for t in fa.transitions().iter().filter(|t| t.is_epsilon()) {
        successors.entry(&t.from).or_default().push(&t.to);
    }

    fa.states()
        .iter()
        .map(|origin| {
            let mut closed = StateSet::new();
            let mut open = VecDeque::from([origin]);
            while let Some(state) = open.pop_front() {
                if !closed.insert(state.clone()) {
                    continue;
                }
                for &next in successors.get(state).into_iter().flatten() {
                    if !closed.contains(next) {
                        open.push_back(next);
                    }
                }
            }
            (origin.clone(), closed)
        })
        .collect()
}

/// Returns true if an accepting state is reachable from the initial state
/// through epsilon moves alone (depth-first).
fn accepts_empty_word(fa: &Automaton) -> bool {
    let mut stack = vec![fa.initial()];
    let mut closed = BTreeSet::new();
    while let Some(state) = stack.pop() {
        if fa.is_accepting(state) {
            return true;
        }
        if !closed.insert(state) {
            continue;
        }
        for t in fa.transitions_from(state).filter(|t| t.is_epsilon()) {
            if !closed.contains(&t.to) {
                stack.push(&t.to);
            }
        }
    }
    false
}

/// Removes every epsilon move from `fa`.
///
/// Each letter move `p --a--> q` is replaced by `p' --a--> q'` for every `p'`
/// whose closure contains `p` and every `q'` in the closure of `q`. If the
/// empty word is accepted, the initial state becomes accepting. States and the
/// initial state are unchanged.
pub fn eliminate_epsilon(fa: &Automaton) -> Automaton {
    let closures = epsilon_closures(fa);

    let mut reaching: BTreeMap<&State, Vec<&State>> = BTreeMap::new();
    for (origin, closure) in &closures {
        for member in closure {
            reaching.entry(member).or_default().push(origin);
        }
    }

    let mut transitions = BTreeSet::new();
    for letter in fa.transitions().iter().filter(|t| !t.is_epsilon()) {
        let sources = reaching.get(&letter.from).into_iter().flatten();
        for &source in sources {
            for target in closures.get(&letter.to).into_iter().flatten() {
                transitions.insert(Transition::new(
                    source.clone(),
                    letter.label.clone(),
                    target.clone(),
                ));
            }
        }
    }

    let mut accepting = fa.accepting().clone();
    if accepts_empty_word(fa) {
        accepting.insert(fa.initial().clone());
    }

    tracing::debug!(
        "epsilon elimination: {} -> {} transitions, {} accepting states",
        fa.transitions().len(),
        transitions.len(),
        accepting.len()
    );

    Automaton::from_parts(
        fa.states().clone(),
        fa.initial().clone(),
        accepting,
        transitions,
        fa.alphabet().clone(),
    )
}
