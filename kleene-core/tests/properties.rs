//! Language properties of the conversions, checked on random expressions.

use kleene_core::{Automaton, RegularExpression, State};
use proptest::prelude::*;

const MAX_WORD_LEN: usize = 5;

fn words() -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..MAX_WORD_LEN {
        let next: Vec<String> = frontier
            .iter()
            .flat_map(|w| [format!("{}a", w), format!("{}b", w)])
            .collect();
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("a".to_string()), Just("b".to_string())];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({}+{})", l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{}{}", l, r)),
            inner.prop_map(|e| format!("({})*", e)),
        ]
    })
}

fn reference(expr: &str) -> regex::Regex {
    let pattern = format!("^(?:{})$", expr.replace('+', "|"));
    regex::Regex::new(&pattern).unwrap()
}

fn accepts(re: &Option<RegularExpression>, word: &str) -> bool {
    re.as_ref()
        .map(|re| re.to_epsilon_automaton().accepts(word))
        .unwrap_or(false)
}

fn deterministic(expr: &str) -> Automaton {
    RegularExpression::parse(expr)
        .unwrap()
        .to_epsilon_automaton()
        .eliminate_epsilon()
        .to_deterministic()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_thompson_matches_reference(expr in expression()) {
        let fa = RegularExpression::parse(&expr).unwrap().to_epsilon_automaton();
        let reference = reference(&expr);
        for word in words() {
            prop_assert_eq!(fa.accepts(&word), reference.is_match(&word), "{} on '{}'", expr, word);
        }
    }

    #[test]
    fn test_epsilon_elimination_preserves_language(expr in expression()) {
        let fa = RegularExpression::parse(&expr).unwrap().to_epsilon_automaton();
        let nfa = fa.eliminate_epsilon();
        prop_assert!(!nfa.has_epsilon_moves());
        for word in words() {
            prop_assert_eq!(fa.accepts(&word), nfa.accepts(&word), "{} on '{}'", expr, word);
        }
    }

    #[test]
    fn test_round_trip(expr in expression()) {
        let dfa = deterministic(&expr);
        let back = dfa.to_regular_expression(None).unwrap();
        let reference = reference(&expr);
        for word in words() {
            prop_assert_eq!(accepts(&back, &word), reference.is_match(&word), "{} on '{}'", expr, word);
        }
    }

    #[test]
    fn test_deterministic_is_total(expr in expression()) {
        let dfa = deterministic(&expr);
        prop_assert!(dfa.is_deterministic());
        for state in dfa.states() {
            for symbol in dfa.alphabet() {
                let count = dfa
                    .transitions_from(state)
                    .filter(|t| t.label.symbol() == Some(*symbol))
                    .count();
                prop_assert_eq!(count, 1);
            }
        }
    }

    #[test]
    fn test_subset_construction_idempotent(expr in expression()) {
        let once = deterministic(&expr);
        let twice = once.to_deterministic().unwrap();
        prop_assert_eq!(once.states().len(), twice.states().len());
        for word in words() {
            prop_assert_eq!(once.accepts(&word), twice.accepts(&word));
        }
    }

    #[test]
    fn test_elimination_order_independent(expr in expression()) {
        let dfa = deterministic(&expr);
        // Initial and accepting states may survive normalization, so only
        // the others are ordered explicitly.
        let forward: Vec<State> = dfa
            .states()
            .iter()
            .filter(|s| *s != dfa.initial() && !dfa.is_accepting(s))
            .cloned()
            .collect();
        let backward: Vec<State> = forward.iter().rev().cloned().collect();

        let first = dfa.to_regular_expression(Some(&forward)).unwrap();
        let second = dfa.to_regular_expression(Some(&backward)).unwrap();
        for word in words() {
            prop_assert_eq!(accepts(&first, &word), accepts(&second, &word), "{} on '{}'", expr, word);
        }
    }
}
