//! Regular expression parsing.
//!
//! Expressions are written over alphabet symbols with the operators:
//!
//! - `r*` - Kleene star (binds tightest, applies to a symbol or a group)
//! - `rs` - concatenation
//! - `r+s` - union (loosest)
//! - `(r)` - grouping
//! - `λ` - the empty string
//!
//! Whitespace is ignored. Examples:
//! - `a` - the single word `a`
//! - `(ab+a)(bb+ba)*(ab+aa)`
//! - `(ab+ba)*+bb`
//!
//! An expression is classified by its outermost operator. Union splits at the
//! leftmost top-level `+`, so `a+b+c` is `a` united with `b+c`. Concatenation
//! splits after the shortest leading factor, so `abc` is `a` followed by `bc`.

use crate::automaton::Automaton;
use crate::error::KleeneError;
use crate::symbol::{Alphabet, Symbol, EPSILON};
use crate::thompson;
use std::fmt;
use std::str::FromStr;

/// The outermost operator of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Star,
    Union,
    Concatenation,
    Atom,
}

/// A leaf of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atom {
    Symbol(Symbol),
    /// The empty string, written `λ`.
    Epsilon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Atom(Atom),
    Star(Box<RegularExpression>),
    Union(Box<RegularExpression>, Box<RegularExpression>),
    Concatenation(Box<RegularExpression>, Box<RegularExpression>),
}

/// A parsed regular expression.
///
/// Holds its normalized text (whitespace and redundant enclosing parentheses
/// removed) and its sub-expressions, which are parsed once on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularExpression {
    text: String,
    node: Node,
}

impl RegularExpression {
    /// Parses an expression, rejecting empty input, invalid characters,
    /// unbalanced parentheses and misplaced operators.
    pub fn parse(input: &str) -> Result<Self, KleeneError> {
        let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            return Err(KleeneError::parse(input, "empty expression"));
        }

        let mut depth = 0usize;
        for &c in &chars {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| KleeneError::parse(input, "unbalanced ')'"))?;
                }
                '+' | '*' => {}
                c if c == EPSILON || Symbol::is_valid(c) => {}
                c => {
                    return Err(KleeneError::parse(
                        input,
                        format!("invalid character '{}'", c),
                    ))
                }
            }
        }
        if depth != 0 {
            return Err(KleeneError::parse(input, "unbalanced '('"));
        }

        Self::build(&chars)
    }

    fn build(chars: &[char]) -> Result<Self, KleeneError> {
        let chars = strip_enclosing(chars);
        let text: String = chars.iter().collect();
        let len = chars.len();

        if len == 0 {
            return Err(KleeneError::parse(&text, "empty sub-expression"));
        }

        if len == 1 {
            let c = chars[0];
            let atom = if c == EPSILON {
                Atom::Epsilon
            } else if Symbol::is_valid(c) {
                Atom::Symbol(Symbol::new(c)?)
            } else {
                return Err(KleeneError::parse(
                    &text,
                    format!("operator '{}' without operand", c),
                ));
            };
            return Ok(Self {
                text,
                node: Node::Atom(atom),
            });
        }

        if len == 2 && chars[1] == '*' {
            let inner = Self::build(&chars[..1])?;
            return Ok(Self {
                text,
                node: Node::Star(Box::new(inner)),
            });
        }

        if chars[0] == '(' && chars[len - 1] == '*' && matching_close(chars, 0) == Some(len - 2) {
            let inner = Self::build(&chars[1..len - 2])?;
            return Ok(Self {
                text,
                node: Node::Star(Box::new(inner)),
            });
        }

        if let Some(split) = top_level_union(chars) {
            let left = Self::build(&chars[..split])?;
            let right = Self::build(&chars[split + 1..])?;
            return Ok(Self {
                text,
                node: Node::Union(Box::new(left), Box::new(right)),
            });
        }

        // Split the whole concatenation spine in one pass, so long
        // concatenations do not recurse once per factor.
        let mut factors = Vec::new();
        let mut start = 0;
        while start < len {
            let mut end = if chars[start] == '(' {
                matching_close(chars, start)
                    .map(|close| close + 1)
                    .ok_or_else(|| KleeneError::parse(&text, "unbalanced '('"))?
            } else {
                start + 1
            };
            if chars.get(end) == Some(&'*') {
                end += 1;
            }
            factors.push(start..end);
            start = end;
        }
        if factors.len() < 2 {
            return Err(KleeneError::parse(&text, "dangling operator"));
        }

        let mut built = Vec::with_capacity(factors.len());
        for range in &factors {
            built.push(Self::build(&chars[range.clone()])?);
        }

        // Fold right: each remainder spans from its leading factor to the end.
        let mut factors = factors.into_iter().rev();
        let mut built = built.into_iter().rev();
        let mut rest = built
            .next()
            .ok_or_else(|| KleeneError::parse(&text, "dangling operator"))?;
        factors.next();
        for (range, first) in factors.zip(built) {
            let node = Node::Concatenation(Box::new(first), Box::new(rest));
            rest = Self {
                text: if range.start == 0 {
                    text.clone()
                } else {
                    chars[range.start..].iter().collect()
                },
                node,
            };
        }
        Ok(rest)
    }

    /// Returns the normalized text of the expression.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ExpressionKind {
        match self.node {
            Node::Atom(_) => ExpressionKind::Atom,
            Node::Star(_) => ExpressionKind::Star,
            Node::Union(..) => ExpressionKind::Union,
            Node::Concatenation(..) => ExpressionKind::Concatenation,
        }
    }

    /// The expression under the star, if this is a star expression.
    pub fn star_operand(&self) -> Option<&RegularExpression> {
        match &self.node {
            Node::Star(inner) => Some(inner),
            _ => None,
        }
    }

    /// The two operands, if this is a union.
    pub fn union_operands(&self) -> Option<(&RegularExpression, &RegularExpression)> {
        match &self.node {
            Node::Union(left, right) => Some((left, right)),
            _ => None,
        }
    }

    /// The leading factor and the remainder, if this is a concatenation.
    pub fn concatenation_operands(&self) -> Option<(&RegularExpression, &RegularExpression)> {
        match &self.node {
            Node::Concatenation(first, second) => Some((first, second)),
            _ => None,
        }
    }

    /// The leaf value, if this is an atom.
    pub fn atom(&self) -> Option<Atom> {
        match self.node {
            Node::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Returns the distinct symbols used by the expression.
    pub fn alphabet(&self) -> Alphabet {
        let mut alphabet = Alphabet::new();
        self.collect_symbols(&mut alphabet);
        alphabet
    }

    fn collect_symbols(&self, alphabet: &mut Alphabet) {
        match &self.node {
            Node::Atom(Atom::Symbol(s)) => {
                alphabet.insert(*s);
            }
            Node::Atom(Atom::Epsilon) => {}
            Node::Star(inner) => inner.collect_symbols(alphabet),
            Node::Union(a, b) | Node::Concatenation(a, b) => {
                a.collect_symbols(alphabet);
                b.collect_symbols(alphabet);
            }
        }
    }

    /// Builds an epsilon automaton recognizing this expression (Thompson construction).
    pub fn to_epsilon_automaton(&self) -> Automaton {
        thompson::build(self)
    }
}

/// Removes parentheses enclosing the whole expression, as many layers as present.
fn strip_enclosing(mut chars: &[char]) -> &[char] {
    while chars.len() >= 2
        && chars[0] == '('
        && matching_close(chars, 0) == Some(chars.len() - 1)
    {
        chars = &chars[1..chars.len() - 1];
    }
    chars
}

/// Index of the parenthesis closing the one opened at `open`.
fn matching_close(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the leftmost `+` outside any parentheses.
fn top_level_union(chars: &[char]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Returns true if `text` contains a `+` outside any parentheses.
pub(crate) fn has_top_level_union(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    top_level_union(&chars).is_some()
}

impl FromStr for RegularExpression {
    type Err = KleeneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RegularExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> RegularExpression {
        RegularExpression::parse(s).unwrap()
    }

    #[test]
    fn test_atom() {
        let re = parse("a");
        assert_eq!(re.kind(), ExpressionKind::Atom);
        assert_eq!(re.atom(), Some(Atom::Symbol(Symbol::new('a').unwrap())));
        assert!(re.star_operand().is_none());
        assert!(re.union_operands().is_none());
        assert!(re.concatenation_operands().is_none());
    }

    #[test]
    fn test_epsilon_atom() {
        let re = parse("λ");
        assert_eq!(re.atom(), Some(Atom::Epsilon));
        assert!(re.alphabet().is_empty());
    }

    #[test]
    fn test_whitespace_ignored() {
        let re = parse(" a b + c ");
        assert_eq!(re.as_str(), "ab+c");
        assert_eq!(re.kind(), ExpressionKind::Union);
    }

    #[test]
    fn test_short_star() {
        let re = parse("a*");
        assert_eq!(re.kind(), ExpressionKind::Star);
        assert_eq!(re.star_operand().unwrap().as_str(), "a");
    }

    #[test]
    fn test_group_star() {
        let re = parse("(ab+ba)*");
        assert_eq!(re.kind(), ExpressionKind::Star);
        let inner = re.star_operand().unwrap();
        assert_eq!(inner.as_str(), "ab+ba");
        assert_eq!(inner.kind(), ExpressionKind::Union);
    }

    #[test]
    fn test_group_star_is_not_concatenation_of_groups() {
        // The paren opened at 0 closes before the end, so this is a concatenation.
        let re = parse("(a)(b)*");
        assert_eq!(re.kind(), ExpressionKind::Concatenation);
        let (first, second) = re.concatenation_operands().unwrap();
        assert_eq!(first.as_str(), "a");
        assert_eq!(second.as_str(), "(b)*");
        assert_eq!(second.kind(), ExpressionKind::Star);
    }

    #[test]
    fn test_union_splits_leftmost() {
        let re = parse("a+b+c");
        let (left, right) = re.union_operands().unwrap();
        assert_eq!(left.as_str(), "a");
        assert_eq!(right.as_str(), "b+c");
        assert_eq!(right.kind(), ExpressionKind::Union);
    }

    #[test]
    fn test_union_ignores_nested_plus() {
        let re = parse("(a+b)c+d");
        let (left, right) = re.union_operands().unwrap();
        assert_eq!(left.as_str(), "(a+b)c");
        assert_eq!(right.as_str(), "d");
    }

    #[test]
    fn test_concatenation_leading_factor() {
        let re = parse("ab*c");
        let (first, rest) = re.concatenation_operands().unwrap();
        assert_eq!(first.as_str(), "a");
        assert_eq!(rest.as_str(), "b*c");

        let (first, rest) = rest.concatenation_operands().unwrap();
        assert_eq!(first.as_str(), "b*");
        assert_eq!(rest.as_str(), "c");
    }

    #[test]
    fn test_long_concatenation() {
        let text = "ab".repeat(500);
        let re = parse(&text);
        assert_eq!(re.as_str(), text);

        let mut node = &re;
        let mut factors = 1;
        while let Some((first, rest)) = node.concatenation_operands() {
            assert_eq!(first.kind(), ExpressionKind::Atom);
            assert_eq!(rest.as_str().len(), node.as_str().len() - 1);
            node = rest;
            factors += 1;
        }
        assert_eq!(factors, 1000);
        assert_eq!(node.as_str(), "b");
    }

    #[test]
    fn test_concatenation_group_with_star() {
        let re = parse("(ab+a)(bb+ba)*(ab+aa)");
        assert_eq!(re.kind(), ExpressionKind::Concatenation);
        let (first, rest) = re.concatenation_operands().unwrap();
        assert_eq!(first.as_str(), "ab+a");
        assert_eq!(rest.as_str(), "(bb+ba)*(ab+aa)");

        let (star, last) = rest.concatenation_operands().unwrap();
        assert_eq!(star.as_str(), "(bb+ba)*");
        assert_eq!(star.kind(), ExpressionKind::Star);
        assert_eq!(last.as_str(), "ab+aa");
    }

    #[test]
    fn test_redundant_parentheses() {
        assert_eq!(parse("(a+b)").as_str(), "a+b");
        assert_eq!(parse("((a))").as_str(), "a");
        assert_eq!(parse("((a))").kind(), ExpressionKind::Atom);
        // Not redundant: the first group closes early.
        assert_eq!(parse("(a)+(b)").as_str(), "(a)+(b)");
    }

    #[test]
    fn test_alphabet() {
        let alphabet: String = parse("(ab+ba)*+bb").alphabet().iter().map(|s| s.as_char()).collect();
        assert_eq!(alphabet, "ab");
    }

    #[test]
    fn test_display_and_from_str() {
        let re: RegularExpression = "(a + b)*".parse().unwrap();
        assert_eq!(re.to_string(), "(a+b)*");
    }

    #[test]
    fn test_parse_empty() {
        assert!(RegularExpression::parse("").is_err());
        assert!(RegularExpression::parse("   ").is_err());
        assert!(RegularExpression::parse("()").is_err());
    }

    #[test]
    fn test_parse_unbalanced() {
        assert!(RegularExpression::parse("(a").is_err());
        assert!(RegularExpression::parse("a)").is_err());
        assert!(RegularExpression::parse(")a(").is_err());
        assert!(RegularExpression::parse("(ab+a)(bb").is_err());
    }

    #[test]
    fn test_parse_invalid_character() {
        let err = RegularExpression::parse("a-b").unwrap_err();
        assert!(matches!(err, KleeneError::Parse { .. }));
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(RegularExpression::parse("a|b").is_err());
    }

    #[test]
    fn test_parse_misplaced_operators() {
        assert!(RegularExpression::parse("*").is_err());
        assert!(RegularExpression::parse("+").is_err());
        assert!(RegularExpression::parse("a+").is_err());
        assert!(RegularExpression::parse("+a").is_err());
        assert!(RegularExpression::parse("*a").is_err());
        assert!(RegularExpression::parse("a**").is_err());
        assert!(RegularExpression::parse("(+a)b").is_err());
        assert!(RegularExpression::parse("()*").is_err());
    }

    #[test]
    fn test_has_top_level_union() {
        assert!(has_top_level_union("a+b"));
        assert!(has_top_level_union("(a)+b"));
        assert!(!has_top_level_union("(a+b)c"));
        assert!(!has_top_level_union("(a+b)*"));
    }
}
