//! Alphabet symbols and transition labels.

use crate::error::KleeneError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Literal used in expression text for the empty string.
pub const EPSILON: char = 'λ';

/// A single alphabet character.
///
/// Only ASCII alphanumerics are symbols; everything else is either an
/// operator, the epsilon literal, or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(char);

impl Symbol {
    pub fn new(c: char) -> Result<Self, KleeneError> {
        if Self::is_valid(c) {
            Ok(Self(c))
        } else {
            Err(KleeneError::invariant(format!(
                "'{}' is not a valid alphabet symbol",
                c
            )))
        }
    }

    /// Returns true if `c` may be used as an alphabet symbol.
    pub fn is_valid(c: char) -> bool {
        c.is_ascii_alphanumeric()
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = KleeneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Symbol::new(c),
            _ => Err(KleeneError::invariant(format!(
                "symbol '{}' must be exactly one character",
                s
            ))),
        }
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0.to_string()
    }
}

/// A finite alphabet.
pub type Alphabet = BTreeSet<Symbol>;

/// The label carried by a transition.
///
/// Concrete automata only use `Epsilon` and `Symbol`; `Expr` labels appear in
/// the generalized automaton built during state elimination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// A move that consumes no input.
    Epsilon,
    /// A move on one alphabet symbol.
    Symbol(Symbol),
    /// A move on any word of a regular expression.
    Expr(String),
}

impl Label {
    /// Parses a label from definition text: `""` is epsilon, one character a symbol.
    pub fn parse_move(text: &str) -> Result<Self, KleeneError> {
        if text.is_empty() || text == EPSILON.to_string() {
            return Ok(Label::Epsilon);
        }
        Symbol::try_from(text.to_string()).map(Label::Symbol)
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Label::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    /// Expression text for this label. Epsilon renders as `λ`.
    pub fn to_expression(&self) -> String {
        match self {
            Label::Epsilon => EPSILON.to_string(),
            Label::Symbol(s) => s.to_string(),
            Label::Expr(e) => e.clone(),
        }
    }

    /// Text used in automaton definitions, where epsilon is the empty string.
    pub fn to_definition(&self) -> String {
        match self {
            Label::Epsilon => String::new(),
            other => other.to_expression(),
        }
    }
}

impl From<Symbol> for Label {
    fn from(symbol: Symbol) -> Self {
        Label::Symbol(symbol)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_validation() {
        assert!(Symbol::new('a').is_ok());
        assert!(Symbol::new('7').is_ok());
        assert!(Symbol::new('+').is_err());
        assert!(Symbol::new('*').is_err());
        assert!(Symbol::new(EPSILON).is_err());
        assert!(Symbol::new(' ').is_err());
    }

    #[test]
    fn test_symbol_serde() {
        let symbol: Symbol = serde_json::from_str("\"b\"").unwrap();
        assert_eq!(symbol.as_char(), 'b');
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"b\"");

        assert!(serde_json::from_str::<Symbol>("\"ab\"").is_err());
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(Label::parse_move("").unwrap(), Label::Epsilon);
        assert_eq!(Label::parse_move("λ").unwrap(), Label::Epsilon);
        assert_eq!(
            Label::parse_move("a").unwrap(),
            Label::Symbol(Symbol::new('a').unwrap())
        );
        assert!(Label::parse_move("ab").is_err());
        assert!(Label::parse_move("(").is_err());
    }

    #[test]
    fn test_label_ordering() {
        let a = Label::Symbol(Symbol::new('a').unwrap());
        let b = Label::Symbol(Symbol::new('b').unwrap());
        assert!(Label::Epsilon < a);
        assert!(a < b);
    }

    #[test]
    fn test_label_rendering() {
        assert_eq!(Label::Epsilon.to_expression(), "λ");
        assert_eq!(Label::Epsilon.to_definition(), "");
        assert_eq!(Label::Expr("a+b".into()).to_string(), "a+b");
    }
}
