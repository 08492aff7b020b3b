//! Command execution.

use crate::config::Config;
use crate::{Commands, Stage};
use colored::Colorize;
use kleene_core::{Automaton, ExpressionKind, RegularExpression, State};
use std::path::Path;

/// Executes a command and returns the formatted output.
pub fn execute(cmd: Commands, config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Parse { expression } => {
            let re = RegularExpression::parse(&expression)?;
            let mut output = String::new();
            format_tree(&re, 0, &mut output);
            Ok(output.trim_end().to_string())
        }

        Commands::Convert { expression, stage } => {
            let re = RegularExpression::parse(&expression)?;
            let epsilon = re.to_epsilon_automaton();
            let nfa = epsilon.eliminate_epsilon();
            let dfa = nfa.to_deterministic_with(&config.conversion)?;
            let extracted = dfa.to_regular_expression(None)?;

            let sections = [
                (Stage::Epsilon, "Epsilon automaton", epsilon.to_string()),
                (Stage::Nfa, "Without epsilon moves", nfa.to_string()),
                (Stage::Dfa, "Deterministic automaton", dfa.to_string()),
                (Stage::Regex, "Regular expression", format_expression(&extracted)),
            ];

            let output: Vec<String> = sections
                .iter()
                .filter(|(s, _, _)| stage.map_or(true, |wanted| wanted == *s))
                .map(|(_, title, body)| format!("{}\n{}", title.bold(), body))
                .collect();
            Ok(output.join("\n\n"))
        }

        Commands::Accepts { expression, words } => {
            let re = RegularExpression::parse(&expression)?;
            let dfa = re
                .to_epsilon_automaton()
                .to_deterministic_with(&config.conversion)?;

            let lines: Vec<String> = words
                .iter()
                .map(|word| {
                    let verdict = if dfa.accepts(word) {
                        "accepted".green()
                    } else {
                        "rejected".red()
                    };
                    format!("{} {}", format_word(word).cyan(), verdict)
                })
                .collect();
            Ok(lines.join("\n"))
        }

        Commands::Extract { definition, order } => {
            let fa = load_automaton(&definition)?;
            let order: Option<Vec<State>> =
                order.map(|o| o.into_iter().map(State::from).collect());
            let extracted = fa.to_regular_expression(order.as_deref())?;
            Ok(format_expression(&extracted))
        }
    }
}

/// Loads an automaton definition, as JSON for `.json` files and YAML otherwise.
fn load_automaton(path: &Path) -> Result<Automaton, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let fa = if is_json {
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Automaton::from_json(&value)?
    } else {
        Automaton::from_yaml(&content)?
    };
    tracing::debug!(
        "loaded automaton from {}: {} states, {} transitions",
        path.display(),
        fa.states().len(),
        fa.transitions().len()
    );
    Ok(fa)
}

fn format_tree(re: &RegularExpression, depth: usize, out: &mut String) {
    let kind = match re.kind() {
        ExpressionKind::Star => "star",
        ExpressionKind::Union => "union",
        ExpressionKind::Concatenation => "concatenation",
        ExpressionKind::Atom => "atom",
    };
    out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), kind.cyan(), re));

    if let Some(inner) = re.star_operand() {
        format_tree(inner, depth + 1, out);
    } else if let Some((a, b)) = re
        .union_operands()
        .or_else(|| re.concatenation_operands())
    {
        format_tree(a, depth + 1, out);
        format_tree(b, depth + 1, out);
    }
}

fn format_expression(re: &Option<RegularExpression>) -> String {
    match re {
        Some(re) => re.to_string(),
        None => format!("{} {}", kleene_core::state::EMPTY_SET, "(empty language)".yellow()),
    }
}

fn format_word(word: &str) -> String {
    if word.is_empty() {
        "λ".to_string()
    } else {
        word.to_string()
    }
}
