//! Cross-specialty insights and the unified-perspective appendix.

use super::assessment::{pattern_names, shared_names, SymptomConnection};
use super::engine::{PatternMatch, SystemScore, SystemsEngine};
use ddx_config::BodySystem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NO_SYMPTOMS_REPORTED: &str = "No symptoms reported to analyze.";

const UNIFIED_APPROACH: &str = "Rather than consulting each specialist separately, a unified \
approach that considers the interconnections between these areas would be more effective.";

const SPECIALTY_CLOSING: &str = "Modern medicine tends to compartmentalize treatment by specialty, \
but your health concerns demonstrate why an integrated approach is essential. Inflammation, diet, \
stress, and sleep can affect multiple body systems simultaneously, creating a complex web of \
symptoms that crosses traditional medical boundaries.";

const PERSPECTIVE_NOTE: &str = "*Note: This integrated perspective is meant to complement, not \
replace, traditional medical approaches. It highlights the interconnections between your symptoms \
that might be missed when each is addressed in isolation.*";

/// Reported symptoms needed before the unified perspective is offered.
const MIN_SYMPTOMS_FOR_PERSPECTIVE: usize = 2;
/// Involvement at which a system counts as significant.
const SIGNIFICANT_INVOLVEMENT: f64 = 0.5;

/// Medical specialty that usually owns a body system.
pub fn specialty_for(system: BodySystem) -> &'static str {
    match system {
        BodySystem::Neurological => "Neurology",
        BodySystem::Endocrine => "Endocrinology",
        BodySystem::Immune => "Immunology",
        BodySystem::Digestive => "Gastroenterology",
        BodySystem::Cardiovascular => "Cardiology",
        BodySystem::Respiratory => "Pulmonology",
        BodySystem::Musculoskeletal => "Orthopedics/Rheumatology",
        BodySystem::Integumentary => "Dermatology",
        BodySystem::Urinary => "Urology/Nephrology",
        BodySystem::Reproductive => "Gynecology/Urology",
        BodySystem::MentalHealth => "Psychiatry/Psychology",
        BodySystem::Metabolic => "Endocrinology/Nutrition",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecialtyScore {
    pub specialty: String,
    pub system: BodySystem,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CrossSpecialtyInsights {
    pub specialties_involved: Vec<SpecialtyScore>,
    pub symptom_connections: Vec<SymptomConnection>,
    pub potential_patterns: Vec<PatternMatch>,
    pub summary: String,
}

impl SystemsEngine {
    /// The specialties behind the three most involved systems, with the
    /// connections and patterns that cut across them.
    pub fn cross_specialty_insights<S: AsRef<str>>(&self, symptoms: &[S]) -> CrossSpecialtyInsights {
        if symptoms.is_empty() {
            return CrossSpecialtyInsights {
                summary: NO_SYMPTOMS_REPORTED.to_string(),
                ..Default::default()
            };
        }

        let report = self.explain_symptom_connections(symptoms);
        let specialties: Vec<SpecialtyScore> = report
            .affected_systems
            .iter()
            .take(3)
            .map(|s| SpecialtyScore {
                specialty: specialty_for(s.system).to_string(),
                system: s.system,
                score: s.score,
            })
            .collect();

        let mut parts = Vec::new();
        if !specialties.is_empty() {
            let names: Vec<&str> = specialties.iter().map(|s| s.specialty.as_str()).collect();
            parts.push(format!(
                "Your symptoms span multiple medical specialties including {}.",
                names.join(", ")
            ));
            parts.push(UNIFIED_APPROACH.to_string());
        }
        parts.push(report.summary.clone());
        if !report.potential_patterns.is_empty() {
            parts.push(format!(
                "Your symptoms suggest patterns consistent with {}, which often require a \
                 multi-disciplinary approach.",
                pattern_names(&report.potential_patterns, 2)
            ));
        }
        parts.push(SPECIALTY_CLOSING.to_string());

        CrossSpecialtyInsights {
            specialties_involved: specialties,
            symptom_connections: report.symptom_connections,
            potential_patterns: report.potential_patterns,
            summary: parts.join(" "),
        }
    }
}

/// Whether enough is going on to offer the unified perspective: at least
/// two reported symptoms and two systems involved at 0.5 or more.
pub fn warrants_unified_perspective(reported: usize, involvement: &[SystemScore]) -> bool {
    reported >= MIN_SYMPTOMS_FOR_PERSPECTIVE
        && involvement
            .iter()
            .filter(|s| s.score >= SIGNIFICANT_INVOLVEMENT)
            .count()
            >= 2
}

/// Append the unified-perspective section to a response.
pub fn append_unified_perspective(response: &str, insights: &CrossSpecialtyInsights) -> String {
    let mut out = String::from(response);
    out.push_str("\n\n---\n\n");
    out.push_str("**Unified Health Perspective:**\n\n");
    out.push_str(&insights.summary);

    if !insights.symptom_connections.is_empty() {
        out.push_str("\n\n**Key Symptom Connections:**\n");
        for (i, conn) in insights.symptom_connections.iter().take(2).enumerate() {
            out.push_str(&format!(
                "{}. Your {} and {} are connected through the {} systems.\n",
                i + 1,
                conn.symptom1,
                conn.symptom2,
                shared_names(&conn.shared_systems, 2)
            ));
        }
    }

    out.push_str("\n\n");
    out.push_str(PERSPECTIVE_NOTE);
    out
}
