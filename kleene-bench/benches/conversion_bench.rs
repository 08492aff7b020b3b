//! Conversion benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kleene_core::{Automaton, ConversionConfig, RegularExpression};

const EXPRESSIONS: &[(&str, &str)] = &[
    ("atom", "a"),
    ("textbook", "(ab+a)(bb+ba)*(ab+aa)"),
    ("nested_star", "((a+b)*c)*(ab+ba)*"),
    ("suffix_4", "(a+b)*a(a+b)(a+b)(a+b)"),
];

fn parsed(expr: &str) -> RegularExpression {
    RegularExpression::parse(expr).unwrap()
}

/// Counter modulo `n` over `{a,b}`: `a` advances, `b` resets.
fn counter_automaton(n: usize) -> Automaton {
    let states: Vec<String> = (0..n).map(|i| format!("q{}", i)).collect();
    let transitions: Vec<serde_json::Value> = (0..n)
        .flat_map(|i| {
            [
                serde_json::json!({"from": format!("q{}", i), "label": "a", "to": format!("q{}", (i + 1) % n)}),
                serde_json::json!({"from": format!("q{}", i), "label": "b", "to": "q0"}),
            ]
        })
        .collect();
    Automaton::from_json(&serde_json::json!({
        "states": states,
        "initial": "q0",
        "accepting": ["q0"],
        "transitions": transitions
    }))
    .unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("regex_parse");
    for (name, expr) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::from_parameter(name), expr, |b, expr| {
            b.iter(|| black_box(RegularExpression::parse(expr).unwrap()))
        });
    }
    group.finish();
}

fn bench_thompson(c: &mut Criterion) {
    let mut group = c.benchmark_group("thompson");
    for (name, expr) in EXPRESSIONS {
        let re = parsed(expr);
        group.bench_function(*name, |b| b.iter(|| black_box(re.to_epsilon_automaton())));
    }
    group.finish();
}

fn bench_epsilon_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("epsilon_elimination");
    for (name, expr) in EXPRESSIONS {
        let fa = parsed(expr).to_epsilon_automaton();
        group.bench_function(*name, |b| b.iter(|| black_box(fa.eliminate_epsilon())));
    }
    group.finish();
}

fn bench_subset_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset_construction");
    let config = ConversionConfig::unlimited();
    for (name, expr) in EXPRESSIONS {
        let nfa = parsed(expr).to_epsilon_automaton().eliminate_epsilon();
        group.bench_function(*name, |b| {
            b.iter(|| black_box(nfa.to_deterministic_with(&config).unwrap()))
        });
    }
    group.finish();
}

fn bench_state_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_elimination");
    for n in [2, 4, 8] {
        let fa = counter_automaton(n);
        group.bench_with_input(BenchmarkId::new("counter", n), &fa, |b, fa| {
            b.iter(|| black_box(fa.to_regular_expression(None).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_thompson,
    bench_epsilon_elimination,
    bench_subset_construction,
    bench_state_elimination
);
criterion_main!(benches);
