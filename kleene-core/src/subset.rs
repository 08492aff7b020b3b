//! Subset construction: nondeterministic to deterministic automaton.

use crate::automaton::Automaton;
use crate::error::KleeneError;
use crate::state::{canonical_key, fresh_state, State, StateSet};
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Limits applied by the conversions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Maximum number of deterministic states subset construction may
    /// create (0 = unlimited).
    pub max_deterministic_states: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_deterministic_states: 10_000,
        }
    }
}

impl ConversionConfig {
    /// Returns a configuration without any limit.
    pub fn unlimited() -> Self {
        Self {
            max_deterministic_states: 0,
        }
    }

    fn exceeds(&self, count: usize) -> bool {
        self.max_deterministic_states != 0 && count > self.max_deterministic_states
    }
}

/// Names subsets by their canonical key. A key already held by a different
/// subset (possible when state labels contain `{`, `,` or `}`) gets primes
/// appended until it is unique.
#[derive(Default)]
struct SubsetNames {
    names: BTreeMap<StateSet, State>,
    taken: StateSet,
}

impl SubsetNames {
    fn name(&mut self, set: &StateSet) -> State {
        if let Some(name) = self.names.get(set) {
            return name.clone();
        }
        let name = fresh_state(&canonical_key(set), &self.taken);
        self.taken.insert(name.clone());
        self.names.insert(set.clone(), name.clone());
        name
    }
}

/// Builds a total deterministic automaton equivalent to `fa`.
///
/// Deterministic states are named by the canonical key of the underlying set
/// (`{1,2}`), the empty set being the dead state `∅`; colliding keys are
/// primed. Only subsets reachable from `{initial}` are created. Epsilon
/// moves, if any, are eliminated first.
pub fn to_deterministic(fa: &Automaton, config: &ConversionConfig) -> Result<Automaton, KleeneError> {
    if fa.has_epsilon_moves() {
        tracing::debug!("subset construction: eliminating epsilon moves first");
        return to_deterministic(&fa.eliminate_epsilon(), config);
    }

    let start = StateSet::from([fa.initial().clone()]);
    let mut names = SubsetNames::default();
    let initial = names.name(&start);

    let mut states = StateSet::new();
    let mut accepting = StateSet::new();
    let mut transitions = BTreeSet::new();

    let mut open = VecDeque::from([start]);
    let mut closed: BTreeSet<StateSet> = BTreeSet::new();

    while let Some(set) = open.pop_front() {
        if closed.contains(&set) {
            continue;
        }

        let name = names.name(&set);
        if set.iter().any(|s| fa.is_accepting(s)) {
            accepting.insert(name.clone());
        }

        for &symbol in fa.alphabet() {
            let next: StateSet = fa
                .transitions()
                .iter()
                .filter(|t| t.label.symbol() == Some(symbol) && set.contains(&t.from))
                .map(|t| t.to.clone())
                .collect();

            transitions.insert(Transition::new(name.clone(), symbol, names.name(&next)));
            if !closed.contains(&next) {
                open.push_back(next);
            }
        }

        tracing::trace!("subset construction: created state {}", name);
        states.insert(name);
        closed.insert(set);

        if config.exceeds(closed.len()) {
            return Err(KleeneError::StateLimitExceeded {
                limit: config.max_deterministic_states,
            });
        }
    }

    tracing::debug!(
        "subset construction: {} -> {} states, {} transitions",
        fa.states().len(),
        states.len(),
        transitions.len()
    );

    Ok(Automaton::from_parts(
        states,
        initial,
        accepting,
        transitions,
        fa.alphabet().clone(),
    ))
}
