//! # kleene-core
//!
//! Conversions between regular expressions and finite automata.
//!
//! This crate provides:
//! - Regular expression parsing and classification
//! - Thompson construction (expression to epsilon automaton)
//! - Epsilon elimination
//! - Subset construction (deterministic automaton)
//! - State elimination (automaton to expression)
//! - Automaton definitions in JSON and YAML

pub mod automaton;
pub mod elimination;
pub mod epsilon;
pub mod error;
pub mod regex;
pub mod state;
pub mod subset;
pub mod symbol;
pub mod thompson;
pub mod transition;

pub use automaton::{Automaton, AutomatonDefinition, TransitionDefinition};
pub use elimination::GeneralizedAutomaton;
pub use error::KleeneError;
pub use regex::{Atom, ExpressionKind, RegularExpression};
pub use state::{State, StateSet};
pub use subset::ConversionConfig;
pub use symbol::{Alphabet, Label, Symbol};
pub use transition::Transition;
