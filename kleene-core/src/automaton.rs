//! Finite automaton storage, validation and structural queries.
//!
//! Automata can be described with a JSON (or YAML) definition:
//!
//! ```json
//! {
//!   "states": ["00", "01", "10", "11"],
//!   "initial": "00",
//!   "accepting": ["00"],
//!   "alphabet": ["a", "b"],
//!   "transitions": [
//!     {"from": "00", "label": "a", "to": "10"},
//!     {"from": ["01", "10"], "label": "b", "to": "11"},
//!     {"from": "11", "label": "", "to": "00"}
//!   ]
//! }
//! ```
//!
//! An empty label is an epsilon move. When `alphabet` is omitted it is the set
//! of symbols used by the transitions.

use crate::elimination;
use crate::epsilon;
use crate::error::KleeneError;
use crate::regex::RegularExpression;
use crate::state::{State, StateSet, EMPTY_SET};
use crate::subset::{self, ConversionConfig};
use crate::symbol::{Alphabet, Label, Symbol};
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A transition as written in a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDefinition {
    /// Source state(s). Can be a single state or multiple.
    #[serde(deserialize_with = "deserialize_from_states")]
    pub from: Vec<State>,

    /// Symbol consumed by the move; empty for an epsilon move.
    #[serde(default)]
    pub label: String,

    /// Target state.
    pub to: State,
}

fn deserialize_from_states<'de, D>(deserializer: D) -> Result<Vec<State>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct FromStatesVisitor;

    impl<'de> Visitor<'de> for FromStatesVisitor {
        type Value = Vec<State>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![State(v.to_string())])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut states = Vec::new();
            while let Some(s) = seq.next_element::<String>()? {
                states.push(State(s));
            }
            Ok(states)
        }
    }

    deserializer.deserialize_any(FromStatesVisitor)
}

/// Raw automaton definition as read from or written to a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonDefinition {
    /// All states.
    pub states: Vec<State>,

    /// Initial state.
    pub initial: State,

    /// Accepting states.
    #[serde(default)]
    pub accepting: Vec<State>,

    /// Alphabet; derived from the transitions when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<Vec<Symbol>>,

    /// Transitions.
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
}

/// A validated finite automaton over single-character symbols.
///
/// Covers epsilon automata, nondeterministic and deterministic automata; the
/// difference is only in which transitions are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: StateSet,
    initial: State,
    accepting: StateSet,
    transitions: BTreeSet<Transition>,
    alphabet: Alphabet,
}

impl Automaton {
    /// Creates an automaton, validating that every referenced state exists and
    /// every symbol belongs to the alphabet.
    pub fn new(
        states: StateSet,
        initial: State,
        accepting: StateSet,
        transitions: BTreeSet<Transition>,
        alphabet: Alphabet,
    ) -> Result<Self, KleeneError> {
        if !states.contains(&initial) {
            return Err(KleeneError::invariant(format!(
                "initial state '{}' not in state set",
                initial
            )));
        }

        if let Some(state) = accepting.iter().find(|s| !states.contains(*s)) {
            return Err(KleeneError::invariant(format!(
                "accepting state '{}' not in state set",
                state
            )));
        }

        for t in &transitions {
            if !states.contains(&t.from) {
                return Err(KleeneError::invariant(format!(
                    "transition source '{}' not in state set",
                    t.from
                )));
            }
            if !states.contains(&t.to) {
                return Err(KleeneError::invariant(format!(
                    "transition target '{}' not in state set",
                    t.to
                )));
            }
            match &t.label {
                Label::Epsilon => {}
                Label::Symbol(s) if alphabet.contains(s) => {}
                Label::Symbol(s) => {
                    return Err(KleeneError::invariant(format!(
                        "transition {} uses symbol '{}' outside the alphabet",
                        t, s
                    )));
                }
                Label::Expr(_) => {
                    return Err(KleeneError::invariant(format!(
                        "transition {} carries an expression label",
                        t
                    )));
                }
            }
        }

        Ok(Self {
            states,
            initial,
            accepting,
            transitions,
            alphabet,
        })
    }

    /// Assembles an automaton produced by a conversion, whose invariants hold
    /// by construction.
    pub(crate) fn from_parts(
        states: StateSet,
        initial: State,
        accepting: StateSet,
        transitions: BTreeSet<Transition>,
        alphabet: Alphabet,
    ) -> Self {
        debug_assert!(states.contains(&initial));
        debug_assert!(accepting.is_subset(&states));
        debug_assert!(transitions
            .iter()
            .all(|t| states.contains(&t.from) && states.contains(&t.to)));
        Self {
            states,
            initial,
            accepting,
            transitions,
            alphabet,
        }
    }

    /// Builds an automaton from its raw definition.
    pub fn from_definition(def: AutomatonDefinition) -> Result<Self, KleeneError> {
        let mut transitions = BTreeSet::new();
        for t in &def.transitions {
            let label = Label::parse_move(&t.label)?;
            for from in &t.from {
                transitions.insert(Transition::new(from.clone(), label.clone(), t.to.clone()));
            }
        }

        let alphabet = match def.alphabet {
            Some(symbols) => symbols.into_iter().collect(),
            None => transitions.iter().filter_map(|t| t.label.symbol()).collect(),
        };

        Self::new(
            def.states.into_iter().collect(),
            def.initial,
            def.accepting.into_iter().collect(),
            transitions,
            alphabet,
        )
    }

    /// Parses and validates an automaton from a JSON definition.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, KleeneError> {
        let def: AutomatonDefinition = serde_json::from_value(json.clone())?;
        Self::from_definition(def)
    }

    /// Parses and validates an automaton from a YAML (or JSON) document.
    pub fn from_yaml(text: &str) -> Result<Self, KleeneError> {
        let def: AutomatonDefinition = serde_yaml::from_str(text)?;
        Self::from_definition(def)
    }

    /// Returns the raw definition of this automaton.
    pub fn to_definition(&self) -> AutomatonDefinition {
        AutomatonDefinition {
            states: self.states.iter().cloned().collect(),
            initial: self.initial.clone(),
            accepting: self.accepting.iter().cloned().collect(),
            alphabet: Some(self.alphabet.iter().copied().collect()),
            transitions: self
                .transitions
                .iter()
                .map(|t| TransitionDefinition {
                    from: vec![t.from.clone()],
                    label: t.label.to_definition(),
                    to: t.to.clone(),
                })
                .collect(),
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    pub fn transitions(&self) -> &BTreeSet<Transition> {
        &self.transitions
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn is_accepting(&self, state: &State) -> bool {
        self.accepting.contains(state)
    }

    /// Returns all states with a transition into `to`.
    pub fn states_into(&self, to: &State) -> StateSet {
        self.transitions
            .iter()
            .filter(|t| &t.to == to)
            .map(|t| t.from.clone())
            .collect()
    }

    /// Returns all states reached by a transition out of `from`.
    pub fn states_out_of(&self, from: &State) -> StateSet {
        self.transitions_from(from).map(|t| t.to.clone()).collect()
    }

    /// Iterates over the transitions leaving `from`.
    pub fn transitions_from<'a>(&'a self, from: &'a State) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| &t.from == from)
    }

    /// Looks up a transition between two states. `None` is a normal outcome.
    pub fn lookup_transition(&self, from: &State, to: &State) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| &t.from == from && &t.to == to)
    }

    /// Looks up a state by its label.
    pub fn lookup_state(&self, label: &str) -> Option<&State> {
        self.states.get(&State::from(label))
    }

    /// Returns a copy of this automaton with `old` renamed to `new` everywhere.
    pub fn rename_state(&self, old: &State, new: impl Into<State>) -> Result<Self, KleeneError> {
        let new = new.into();
        if !self.states.contains(old) {
            return Err(KleeneError::UnknownState {
                state: old.to_string(),
            });
        }
        if old == &new {
            return Ok(self.clone());
        }
        if self.states.contains(&new) {
            return Err(KleeneError::invariant(format!(
                "cannot rename '{}' to existing state '{}'",
                old, new
            )));
        }

        let swap = |s: &State| if s == old { new.clone() } else { s.clone() };
        Ok(Self {
            states: self.states.iter().map(swap).collect(),
            initial: swap(&self.initial),
            accepting: self.accepting.iter().map(swap).collect(),
            transitions: self.transitions.iter().map(|t| t.renamed(old, &new)).collect(),
            alphabet: self.alphabet.clone(),
        })
    }

    pub fn has_epsilon_moves(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// Returns true if every state has exactly one move per alphabet symbol
    /// and there are no epsilon moves.
    pub fn is_deterministic(&self) -> bool {
        if self.has_epsilon_moves() {
            return false;
        }
        self.states.iter().all(|state| {
            self.alphabet.iter().all(|symbol| {
                self.transitions_from(state)
                    .filter(|t| t.label.symbol() == Some(*symbol))
                    .count()
                    == 1
            })
        })
    }

    /// Returns the states reachable from `set` by epsilon moves, `set` included.
    pub fn epsilon_closure_of(&self, set: &StateSet) -> StateSet {
        let mut closure = set.clone();
        let mut stack: Vec<&State> = set.iter().collect();
        while let Some(state) = stack.pop() {
            for t in self.transitions_from(state).filter(|t| t.is_epsilon()) {
                if closure.insert(t.to.clone()) {
                    stack.push(&t.to);
                }
            }
        }
        closure
    }

    /// Simulates the automaton on `word`.
    ///
    /// Characters outside the alphabet reject immediately.
    pub fn accepts(&self, word: &str) -> bool {
        let mut current = self.epsilon_closure_of(&StateSet::from([self.initial.clone()]));
        for c in word.chars() {
            let symbol = match Symbol::new(c) {
                Ok(s) if self.alphabet.contains(&s) => s,
                _ => return false,
            };
            let next: StateSet = self
                .transitions
                .iter()
                .filter(|t| t.label.symbol() == Some(symbol) && current.contains(&t.from))
                .map(|t| t.to.clone())
                .collect();
            if next.is_empty() {
                return false;
            }
            current = self.epsilon_closure_of(&next);
        }
        current.iter().any(|s| self.accepting.contains(s))
    }

    /// Removes epsilon moves, keeping the recognized language.
    pub fn eliminate_epsilon(&self) -> Automaton {
        epsilon::eliminate_epsilon(self)
    }

    /// Builds the equivalent deterministic automaton with default limits.
    pub fn to_deterministic(&self) -> Result<Automaton, KleeneError> {
        subset::to_deterministic(self, &ConversionConfig::default())
    }

    /// Builds the equivalent deterministic automaton under `config`.
    pub fn to_deterministic_with(&self, config: &ConversionConfig) -> Result<Automaton, KleeneError> {
        subset::to_deterministic(self, config)
    }

    /// Extracts an equivalent regular expression by state elimination.
    ///
    /// States listed in `order` are eliminated first, in that order; the rest
    /// follow in state order. Returns `None` when the language is empty.
    pub fn to_regular_expression(
        &self,
        order: Option<&[State]>,
    ) -> Result<Option<RegularExpression>, KleeneError> {
        elimination::to_regular_expression(self, order.unwrap_or(&[]))
    }
}

fn format_set<'a, T: fmt::Display + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if items.is_empty() {
        EMPTY_SET.to_string()
    } else {
        format!("{{{}}}", items.join(", "))
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State set: {}", format_set(&self.states))?;
        writeln!(f, "Initial state: {}", self.initial)?;
        writeln!(f, "Accepting state set: {}", format_set(&self.accepting))?;
        writeln!(f, "Transitions: {}", format_set(&self.transitions))?;
        write!(f, "Alphabet: {}", format_set(&self.alphabet))
    }
}
