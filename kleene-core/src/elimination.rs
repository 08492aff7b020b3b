//! State elimination: automaton to regular expression.
//!
//! The automaton is first turned into a generalized automaton whose edges are
//! labeled with expressions, keeping at most one edge per ordered pair of
//! states. Its initial state has no incoming edges and its single accepting
//! state no outgoing edges. Every other state is then eliminated by folding
//! the paths through it into the labels of the remaining edges, until only
//! the edge from the initial to the accepting state is left.

use crate::automaton::Automaton;
use crate::error::KleeneError;
use crate::regex::{has_top_level_union, RegularExpression};
use crate::state::{fresh_state, State, StateSet};
use crate::symbol::Label;
use std::collections::BTreeMap;
use std::fmt;

/// Unites two labels. Identical labels are kept once.
fn union(existing: Label, added: Label) -> Label {
    if existing == added {
        return existing;
    }
    Label::Expr(format!(
        "{}+{}",
        existing.to_expression(),
        added.to_expression()
    ))
}

/// Concatenates labels, dropping epsilons and parenthesizing any operand
/// with a top-level union.
fn concatenate(parts: &[&Label]) -> Label {
    let kept: Vec<&Label> = parts.iter().copied().filter(|l| !l.is_epsilon()).collect();

    match kept.as_slice() {
        [] => Label::Epsilon,
        [only] => (*only).clone(),
        _ => Label::Expr(
            kept.iter()
                .map(|l| {
                    let text = l.to_expression();
                    if has_top_level_union(&text) {
                        format!("({})", text)
                    } else {
                        text
                    }
                })
                .collect(),
        ),
    }
}

/// Kleene star of a self-loop label; a loop on epsilon adds nothing.
fn star(label: &Label) -> Label {
    match label {
        Label::Epsilon => Label::Epsilon,
        other => Label::Expr(format!("({})*", other.to_expression())),
    }
}

/// An automaton whose edges carry regular expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralizedAutomaton {
    states: StateSet,
    initial: State,
    accepting: State,
    edges: BTreeMap<(State, State), Label>,
}

impl GeneralizedAutomaton {
    /// Converts `fa`, uniting parallel transitions and normalizing so that
    /// the initial state has no incoming edges and there is exactly one
    /// accepting state, distinct from the initial one, without outgoing edges.
    pub fn from_automaton(fa: &Automaton) -> Self {
        let mut edges: BTreeMap<(State, State), Label> = BTreeMap::new();
        for t in fa.transitions() {
            let key = (t.from.clone(), t.to.clone());
            let label = match edges.remove(&key) {
                Some(existing) => union(existing, t.label.clone()),
                None => t.label.clone(),
            };
            edges.insert(key, label);
        }

        let mut states = fa.states().clone();
        let mut initial = fa.initial().clone();

        if edges.keys().any(|(_, to)| to == &initial) {
            let fresh = fresh_state("start", &states);
            edges.insert((fresh.clone(), initial), Label::Epsilon);
            states.insert(fresh.clone());
            initial = fresh;
        }

        let accepting_set = fa.accepting();
        let single_accepting = accepting_set.len() == 1
            && !accepting_set.contains(&initial)
            && !edges.keys().any(|(from, _)| accepting_set.contains(from));

        let accepting = match accepting_set.iter().next() {
            Some(only) if single_accepting => only.clone(),
            _ => {
                let fresh = fresh_state("end", &states);
                for old in accepting_set {
                    edges.insert((old.clone(), fresh.clone()), Label::Epsilon);
                }
                states.insert(fresh.clone());
                fresh
            }
        };

        Self {
            states,
            initial,
            accepting,
            edges,
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn accepting(&self) -> &State {
        &self.accepting
    }

    /// The label of the edge from `from` to `to`, if there is one.
    pub fn label(&self, from: &State, to: &State) -> Option<&Label> {
        self.edges.get(&(from.clone(), to.clone()))
    }

    /// States that are neither initial nor accepting.
    pub fn intermediate_states(&self) -> impl Iterator<Item = &State> {
        self.states
            .iter()
            .filter(move |s| *s != &self.initial && *s != &self.accepting)
    }

    /// Removes `state`, rerouting every path through it.
    pub fn eliminate(&mut self, state: &State) -> Result<(), KleeneError> {
        if state == &self.initial {
            return Err(KleeneError::IllegalElimination {
                state: state.to_string(),
                role: "initial",
            });
        }
        if state == &self.accepting {
            return Err(KleeneError::IllegalElimination {
                state: state.to_string(),
                role: "accepting",
            });
        }
        if !self.states.contains(state) {
            return Err(KleeneError::UnknownState {
                state: state.to_string(),
            });
        }

        let loop_factor = self
            .label(state, state)
            .map(star)
            .unwrap_or(Label::Epsilon);

        let incoming: Vec<(State, Label)> = self
            .edges
            .iter()
            .filter(|((from, to), _)| to == state && from != state)
            .map(|((from, _), label)| (from.clone(), label.clone()))
            .collect();
        let outgoing: Vec<(State, Label)> = self
            .edges
            .iter()
            .filter(|((from, to), _)| from == state && to != state)
            .map(|((_, to), label)| (to.clone(), label.clone()))
            .collect();

        let mut rerouted: BTreeMap<(State, State), Label> = BTreeMap::new();
        for (u, into) in &incoming {
            for (v, out) in &outgoing {
                let path = concatenate(&[into, &loop_factor, out]);
                let label = match self.label(u, v) {
                    Some(existing) => union(existing.clone(), path),
                    None => path,
                };
                rerouted.insert((u.clone(), v.clone()), label);
            }
        }

        tracing::trace!(
            "eliminating state {}: {} incoming, {} outgoing",
            state,
            incoming.len(),
            outgoing.len()
        );

        self.edges
            .retain(|(from, to), _| from != state && to != state);
        self.edges.extend(rerouted);
        self.states.remove(state);
        Ok(())
    }

    /// The expression on the edge from the initial to the accepting state, or
    /// `None` if there is no such edge (the language is empty).
    pub fn expression(&self) -> Result<Option<RegularExpression>, KleeneError> {
        self.label(&self.initial, &self.accepting)
            .map(|label| RegularExpression::parse(&label.to_expression()))
            .transpose()
    }
}

impl fmt::Display for GeneralizedAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<&str> = self.states.iter().map(State::as_str).collect();
        writeln!(f, "State set: {{{}}}", states.join(", "))?;
        writeln!(f, "Initial state: {}", self.initial)?;
        writeln!(f, "Accepting state: {}", self.accepting)?;
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|((from, to), label)| format!("<{},{},{}>", from, label, to))
            .collect();
        write!(f, "Transitions: {{{}}}", edges.join(", "))
    }
}

/// Extracts a regular expression from `fa` by state elimination.
///
/// The states in `order` are eliminated first, in order; remaining
/// intermediate states follow in state order. Naming the initial or accepting
/// state of the normalized automaton is an error. `fa` itself is untouched.
pub fn to_regular_expression(
    fa: &Automaton,
    order: &[State],
) -> Result<Option<RegularExpression>, KleeneError> {
    let mut generalized = GeneralizedAutomaton::from_automaton(fa);

    for state in order {
        if !fa.states().contains(state) {
            return Err(KleeneError::UnknownState {
                state: state.to_string(),
            });
        }
        if generalized.states().contains(state) {
            generalized.eliminate(state)?;
        }
    }

    let remaining: Vec<State> = generalized.intermediate_states().cloned().collect();
    for state in &remaining {
        generalized.eliminate(state)?;
    }

    let expression = generalized.expression()?;
    tracing::debug!(
        "state elimination: {} states -> {}",
        fa.states().len(),
        expression
            .as_ref()
            .map(|e| e.as_str())
            .unwrap_or("empty language")
    );
    Ok(expression)
}
