//! Body-systems scenarios over the built-in graph.

use ddx_config::BodySystem;
use ddx_core::session::DiagnosticSession;
use ddx_core::systems::{InterventionCategory, SystemsEngine, PATTERN_THRESHOLD};
use std::collections::BTreeMap;

#[test]
fn headache_and_dizziness_are_neurological() {
    let engine = SystemsEngine::default();
    let scores = engine.analyze_symptom_pattern(&["Headache", "Dizziness"]);
    assert_eq!(scores[0].system, BodySystem::Neurological);
    assert_eq!(scores[0].score, 1.0);
    assert!(scores.iter().skip(1).all(|s| s.score < 1.0 && s.score > 0.0));
}

#[test]
fn patterns_respect_threshold_and_order() {
    let engine = SystemsEngine::default();
    let symptoms = ["Fatigue", "Joint Pain", "Rash", "Recurrent Infections"];
    let patterns = engine.identify_multi_system_patterns(&symptoms, PATTERN_THRESHOLD);
    assert!(patterns.iter().all(|p| p.score >= PATTERN_THRESHOLD));
    for pair in patterns.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let everything = engine.identify_multi_system_patterns(&symptoms, 0.0);
    assert_eq!(everything.len(), engine.graph().patterns.len());
}

#[test]
fn related_questions_skip_reported_and_asked() {
    let engine = SystemsEngine::default();
    let reported = ["Headache", "Fatigue"];
    let first = engine.suggest_related_questions(&reported, &[] as &[&str]);
    assert!(!first.is_empty() && first.len() <= 5);
    assert!(first.iter().all(|s| !reported.contains(&s.as_str())));

    let asked = [first[0].as_str()];
    let second = engine.suggest_related_questions(&reported, &asked);
    assert!(!second.contains(&first[0]));
}

#[test]
fn connections_explain_shared_systems() {
    let engine = SystemsEngine::default();
    let report = engine.explain_symptom_connections(&["Headache", "Dizziness", "Nausea"]);
    assert_eq!(report.symptom_systems.len(), 3);
    assert!(!report.symptom_connections.is_empty());
    for pair in report.symptom_connections.windows(2) {
        assert!(pair[0].connection_strength >= pair[1].connection_strength);
    }
    let hd = report
        .symptom_connections
        .iter()
        .find(|c| c.symptom1 == "Headache" && c.symptom2 == "Dizziness")
        .expect("headache/dizziness connection");
    assert_eq!(hd.shared_systems[0], BodySystem::Neurological);
}

#[test]
fn holistic_assessment_links_reported_lifestyle() {
    let mut session = DiagnosticSession::with_defaults();
    session.observe_batch(&[("Insomnia", true), ("Fatigue", true), ("Anxiety", true)]);
    session.record_lifestyle_factor("sleep", "five hours a night");
    session.record_lifestyle_factor("Astrology", "mercury in retrograde");

    let assessment = session.holistic_assessment();
    assert!(assessment
        .lifestyle_interventions
        .contains_key(&InterventionCategory::Sleep));
    assert!(!assessment.lifestyle_links.is_empty());
    assert!(assessment.lifestyle_links.iter().all(|l| l.factor == "Sleep"));
}

#[test]
fn empty_symptoms_give_canned_text() {
    let engine = SystemsEngine::default();
    let none: [&str; 0] = [];
    assert!(engine.analyze_symptom_pattern(&none).is_empty());
    assert_eq!(
        engine.explain_symptom_connections(&none).summary,
        "No symptoms provided to analyze."
    );
    assert_eq!(
        engine.generate_holistic_assessment(&none, &BTreeMap::new()).summary,
        "No symptoms provided for assessment."
    );
}

#[test]
fn unified_perspective_spans_specialties() {
    let mut session = DiagnosticSession::with_defaults();
    session.observe_batch(&[("Headache", true), ("Dizziness", true)]);
    let insights = session.cross_specialty_insights();
    assert_eq!(insights.specialties_involved[0].specialty, "Neurology");
    let text = session.unified_perspective("Here is what I found.").unwrap();
    assert!(text.contains("Your symptoms span multiple medical specialties including Neurology"));
}
