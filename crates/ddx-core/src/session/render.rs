//! Markdown views of a session for display.

use std::fmt::Write;

use crate::decision::QuestionCandidate;
use crate::inference::{Diagnosis, Observation, ReasoningRecord};
use crate::systems::HolisticAssessment;

/// Text used when there is nothing to explain.
pub const NO_DIAGNOSIS: &str = "No diagnosis available.";

/// Confidence label shown next to a posterior.
pub fn confidence_label(probability: f64) -> &'static str {
    if probability > 0.7 {
        "High"
    } else if probability > 0.4 {
        "Moderate"
    } else {
        "Low"
    }
}

/// Top diagnoses, observed symptoms, and suggested follow-ups.
pub fn diagnostic_summary(
    top: &[Diagnosis],
    observed: &[Observation],
    suggestions: &[QuestionCandidate],
) -> String {
    let mut out = String::from("## Bayesian Diagnostic Assessment\n\n");

    out.push_str("### Top Differential Diagnoses\n");
    for (i, d) in top.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** (Probability: {:.2}, Confidence: {})",
            i + 1,
            d.disease,
            d.probability,
            confidence_label(d.probability)
        );
    }

    if !observed.is_empty() {
        out.push_str("\n### Observed Symptoms\n");
        for obs in observed {
            let status = if obs.present { "Present" } else { "Absent" };
            let _ = writeln!(out, "- {}: {}", obs.symptom, status);
        }
    }

    if !suggestions.is_empty() {
        out.push_str("\n### Suggested Follow-up Questions\n");
        for q in suggestions {
            let _ = writeln!(
                out,
                "- Ask about {} (Information Gain: {:.3})",
                q.symptom, q.information_gain
            );
        }
    }

    out
}

/// Explanation and evidence factors for one disease.
pub fn detailed_diagnosis(record: &ReasoningRecord) -> String {
    let mut out = format!(
        "## Detailed Analysis: {}\n\n{}\n\n",
        record.disease, record.explanation
    );

    if !record.evidence_factors.is_empty() {
        out.push_str("### Evidence Factors\n");
        for f in &record.evidence_factors {
            let status = if f.present { "Presence" } else { "Absence" };
            let _ = writeln!(
                out,
                "- {} of {}: {} {} factor (Likelihood: {:.2})",
                status,
                f.symptom,
                f.strength.label(),
                f.effect.label(),
                f.likelihood_factor
            );
        }
    }

    out
}

/// Body-systems view: involvement, connections, patterns, and advice.
pub fn holistic_assessment(assessment: &HolisticAssessment) -> String {
    let mut out = String::from("## Body Systems Assessment\n\n");
    out.push_str(&assessment.summary);
    out.push('\n');

    if !assessment.affected_systems.is_empty() {
        out.push_str("\n### Affected Systems\n");
        for s in &assessment.affected_systems {
            let _ = writeln!(out, "- {}: {:.2}", s.system, s.score);
        }
    }

    let connections = &assessment.symptom_connections.symptom_connections;
    if !connections.is_empty() {
        out.push_str("\n### Symptom Connections\n");
        for c in connections {
            let shared: Vec<&str> = c.shared_systems.iter().map(|s| s.as_str()).collect();
            let _ = writeln!(
                out,
                "- {} and {} via {} (strength {:.2})",
                c.symptom1,
                c.symptom2,
                shared.join(", "),
                c.connection_strength
            );
        }
    }

    if !assessment.potential_patterns.is_empty() {
        out.push_str("\n### Potential Patterns\n");
        for p in &assessment.potential_patterns {
            let _ = writeln!(out, "- {} ({:.2})", p.pattern, p.score);
        }
    }

    if !assessment.lifestyle_interventions.is_empty() {
        out.push_str("\n### Lifestyle Interventions\n");
        for (category, advice) in &assessment.lifestyle_interventions {
            let _ = writeln!(out, "**{}**", category);
            for a in advice {
                let _ = writeln!(out, "- {}", a);
            }
        }
    }

    if !assessment.suggested_questions.is_empty() {
        out.push_str("\n### Ask Next\n");
        for q in &assessment.suggested_questions {
            let _ = writeln!(out, "- {}", q);
        }
    }

    out
}
