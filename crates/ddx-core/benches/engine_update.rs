//! Criterion benchmarks for the per-answer hot paths in `ddx-core`.
//!
//! Covers the Bayes update, question ranking by information gain, and
//! the body-systems involvement scan.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ddx_core::session::DiagnosticSession;
use ddx_core::{BayesianEngine, SystemsEngine};

const ANSWERS: [(&str, bool); 6] = [
    ("Fever", true),
    ("Cough", true),
    ("Runny Nose", false),
    ("Fatigue", true),
    ("Shortness of Breath", false),
    ("Headache", true),
];

fn bench_update_belief(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference/update_belief");

    for depth in [1usize, 3, 6] {
        group.bench_with_input(BenchmarkId::new("answers", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut engine = BayesianEngine::with_defaults();
                for (symptom, present) in &ANSWERS[..depth] {
                    engine.update_belief(black_box(symptom), *present);
                }
                black_box(engine.entropy());
            })
        });
    }

    group.finish();
}

fn bench_suggest_questions(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision/suggest_questions");

    let fresh = BayesianEngine::with_defaults();
    let mut informed = BayesianEngine::with_defaults();
    for (symptom, present) in &ANSWERS[..3] {
        informed.update_belief(symptom, *present);
    }

    for (name, engine) in [("priors", &fresh), ("three_answers", &informed)] {
        group.bench_with_input(BenchmarkId::new("top3", name), engine, |b, engine| {
            b.iter(|| black_box(engine.suggest_questions(black_box(3))))
        });
    }

    group.finish();
}

fn bench_systems(c: &mut Criterion) {
    let mut group = c.benchmark_group("systems");
    let engine = SystemsEngine::default();
    let reported = ["Headache", "Dizziness", "Fatigue", "Insomnia", "Joint Pain"];

    group.bench_function("analyze_symptom_pattern", |b| {
        b.iter(|| black_box(engine.analyze_symptom_pattern(black_box(&reported))))
    });
    group.bench_function("suggest_related_questions", |b| {
        b.iter(|| {
            black_box(engine.suggest_related_questions(black_box(&reported), &[] as &[&str]))
        })
    });

    group.finish();
}

fn bench_session_observe(c: &mut Criterion) {
    c.bench_function("session/start_intake", |b| {
        b.iter(|| {
            let mut session = DiagnosticSession::with_defaults();
            black_box(session.start_intake(black_box(&ANSWERS)));
        })
    });
}

criterion_group!(
    benches,
    bench_update_belief,
    bench_suggest_questions,
    bench_systems,
    bench_session_observe
);
criterion_main!(benches);
