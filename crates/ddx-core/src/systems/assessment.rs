//! Symptom connection explanations and holistic assessments.
//!
//! Everything here is derived from [`SystemsEngine`] scores; the text is
//! rule-based and keyed only on which systems are involved.

use super::engine::{as_map, desc, PatternMatch, SystemScore, SystemsEngine, PATTERN_THRESHOLD};
use ddx_config::BodySystem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NO_SYMPTOMS_TO_ANALYZE: &str = "No symptoms provided to analyze.";
pub const NO_SYMPTOMS_FOR_ASSESSMENT: &str = "No symptoms provided for assessment.";

const CONNECTION_CLOSING: &str = "From an integrative medicine perspective, these symptoms suggest \
interactions between multiple body systems that should be addressed holistically rather than in \
isolation.";

const HOLISTIC_CLOSING: &str = "From an integrative medicine perspective, addressing the \
interconnections between these systems is essential for resolving your health concerns. This \
requires a unified approach rather than treating each symptom in isolation.";

/// Two reported symptoms linked through systems they both touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymptomConnection {
    pub symptom1: String,
    pub symptom2: String,
    /// Shared systems, strongest combined association first.
    pub shared_systems: Vec<BodySystem>,
    /// Mean over shared systems of the product of both associations.
    pub connection_strength: f64,
}

/// Systems a single symptom maps to, strongest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymptomSystems {
    pub symptom: String,
    pub systems: Vec<SystemScore>,
}

/// How a set of symptoms hangs together across body systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionReport {
    pub affected_systems: Vec<SystemScore>,
    pub symptom_systems: Vec<SymptomSystems>,
    pub symptom_connections: Vec<SymptomConnection>,
    pub potential_patterns: Vec<PatternMatch>,
    pub summary: String,
}

/// Lifestyle intervention groups, in presentation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum InterventionCategory {
    Diet,
    Sleep,
    Exercise,
    #[serde(rename = "Stress Management")]
    StressManagement,
    Environmental,
}

impl fmt::Display for InterventionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterventionCategory::Diet => "Diet",
            InterventionCategory::Sleep => "Sleep",
            InterventionCategory::Exercise => "Exercise",
            InterventionCategory::StressManagement => "Stress Management",
            InterventionCategory::Environmental => "Environmental",
        };
        f.write_str(s)
    }
}

pub type Interventions = BTreeMap<InterventionCategory, Vec<String>>;

/// A reported lifestyle factor bearing on an involved system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LifestyleLink {
    pub factor: String,
    pub system: BodySystem,
    pub impact: f64,
    pub involvement: f64,
}

/// Bundle of everything the systems view can say about a symptom set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HolisticAssessment {
    pub affected_systems: Vec<SystemScore>,
    pub symptom_connections: ConnectionReport,
    pub potential_patterns: Vec<PatternMatch>,
    pub lifestyle_interventions: Interventions,
    pub lifestyle_links: Vec<LifestyleLink>,
    pub suggested_questions: Vec<String>,
    pub summary: String,
}

struct Rule {
    category: InterventionCategory,
    any_of: &'static [BodySystem],
    advice: &'static [&'static str],
}

use BodySystem::*;
use InterventionCategory::*;

const RULES: &[Rule] = &[
    Rule {
        category: Diet,
        any_of: &[Digestive, Immune, Metabolic],
        advice: &[
            "Consider an anti-inflammatory diet rich in whole foods, vegetables, and omega-3 fatty acids",
            "Identify and eliminate potential food sensitivities",
            "Ensure adequate fiber intake to support gut microbiome health",
        ],
    },
    Rule {
        category: Diet,
        any_of: &[Endocrine, Metabolic],
        advice: &[
            "Balance blood sugar by reducing refined carbohydrates and increasing protein and healthy fats",
            "Consider intermittent fasting if appropriate for your condition",
        ],
    },
    Rule {
        category: Diet,
        any_of: &[Cardiovascular],
        advice: &[
            "Reduce sodium intake and increase potassium-rich foods",
            "Include heart-healthy fats like olive oil and avocados",
        ],
    },
    Rule {
        category: Diet,
        any_of: &[Neurological, MentalHealth],
        advice: &[
            "Increase intake of omega-3 fatty acids and antioxidant-rich foods",
            "Consider Mediterranean diet pattern which supports brain health",
        ],
    },
    Rule {
        category: Sleep,
        any_of: &[Neurological, Endocrine, MentalHealth],
        advice: &[
            "Establish a consistent sleep schedule with regular sleep and wake times",
            "Create a relaxing bedtime routine to signal the body it's time to sleep",
            "Optimize sleep environment: dark, quiet, cool room",
        ],
    },
    Rule {
        category: Sleep,
        any_of: &[Respiratory, Cardiovascular],
        advice: &[
            "Consider evaluation for sleep apnea if you have symptoms like snoring or daytime fatigue",
            "Elevate head of bed if you experience nighttime breathing difficulties",
        ],
    },
    Rule {
        category: Exercise,
        any_of: &[Musculoskeletal, Metabolic],
        advice: &[
            "Incorporate strength training 2-3 times per week to support muscle and bone health",
            "Include flexibility exercises like stretching or yoga to improve joint mobility",
        ],
    },
    Rule {
        category: Exercise,
        any_of: &[Cardiovascular, Respiratory],
        advice: &[
            "Aim for 150 minutes of moderate aerobic activity weekly",
            "Consider interval training for cardiovascular health if appropriate for your fitness level",
        ],
    },
    Rule {
        category: Exercise,
        any_of: &[MentalHealth, Neurological],
        advice: &[
            "Include daily movement for mood regulation and cognitive benefits",
            "Consider mind-body exercises like tai chi or yoga",
        ],
    },
    Rule {
        category: StressManagement,
        any_of: &[MentalHealth, Neurological, Endocrine],
        advice: &[
            "Practice daily mindfulness meditation or deep breathing exercises",
            "Consider cognitive behavioral techniques to manage stress responses",
            "Establish healthy boundaries in work and personal life",
        ],
    },
    Rule {
        category: StressManagement,
        any_of: &[Digestive, Immune],
        advice: &[
            "Practice relaxation techniques before meals to support digestion",
            "Consider gut-directed hypnotherapy for digestive symptoms exacerbated by stress",
        ],
    },
    Rule {
        category: StressManagement,
        any_of: &[Cardiovascular],
        advice: &[
            "Monitor stress effects on blood pressure and heart rate",
            "Practice heart rate variability biofeedback techniques",
        ],
    },
    Rule {
        category: Environmental,
        any_of: &[Respiratory, Immune, Integumentary],
        advice: &[
            "Minimize exposure to environmental allergens and toxins",
            "Consider air purification in home and work environments",
            "Use non-toxic personal care and cleaning products",
        ],
    },
    Rule {
        category: Environmental,
        any_of: &[Neurological, Endocrine],
        advice: &[
            "Reduce exposure to endocrine-disrupting chemicals in food containers and products",
            "Create a low-EMF sleep environment by removing electronics from bedroom",
        ],
    },
];

impl SystemsEngine {
    /// Pairwise connections between reported symptoms, plus involvement,
    /// per-symptom systems, matched patterns, and a prose summary.
    pub fn explain_symptom_connections<S: AsRef<str>>(&self, symptoms: &[S]) -> ConnectionReport {
        if symptoms.is_empty() {
            return ConnectionReport {
                summary: NO_SYMPTOMS_TO_ANALYZE.to_string(),
                ..Default::default()
            };
        }

        let affected = self.analyze_symptom_pattern(symptoms);

        let mut distinct: Vec<&str> = Vec::new();
        for symptom in symptoms.iter().map(AsRef::as_ref) {
            if !distinct.contains(&symptom) {
                distinct.push(symptom);
            }
        }

        let symptom_systems: Vec<SymptomSystems> = distinct
            .iter()
            .filter(|s| self.knows_symptom(s))
            .map(|s| SymptomSystems {
                symptom: s.to_string(),
                systems: self.get_systems_for_symptom(s, 0.0),
            })
            .collect();

        let mut connections = Vec::new();
        for (i, first) in distinct.iter().enumerate() {
            for second in &distinct[i + 1..] {
                if let Some(conn) = self.connect(first, second) {
                    connections.push(conn);
                }
            }
        }
        connections.sort_by(|a, b| desc(a.connection_strength, b.connection_strength));

        let patterns = self.match_patterns(&as_map(&affected), PATTERN_THRESHOLD);
        let summary = connection_summary(&affected, &connections, &patterns);

        ConnectionReport {
            affected_systems: affected,
            symptom_systems,
            symptom_connections: connections,
            potential_patterns: patterns,
            summary,
        }
    }

    fn connect(&self, first: &str, second: &str) -> Option<SymptomConnection> {
        let a = self.graph().systems_for(first)?;
        let b = self.graph().systems_for(second)?;

        let mut shared: Vec<(BodySystem, f64)> = a
            .iter()
            .filter_map(|(system, wa)| b.get(system).map(|wb| (*system, wa * wb)))
            .collect();
        if shared.is_empty() {
            return None;
        }
        let strength = shared.iter().map(|(_, p)| p).sum::<f64>() / shared.len() as f64;
        shared.sort_by(|x, y| desc(x.1, y.1));

        Some(SymptomConnection {
            symptom1: first.to_string(),
            symptom2: second.to_string(),
            shared_systems: shared.into_iter().map(|(s, _)| s).collect(),
            connection_strength: strength,
        })
    }

    /// Canned lifestyle advice for the systems present in `affected`.
    ///
    /// Categories with no advice are omitted.
    pub fn suggest_lifestyle_interventions(&self, affected: &[SystemScore]) -> Interventions {
        let mut out = Interventions::new();
        for rule in RULES {
            if rule.any_of.iter().any(|s| affected.iter().any(|a| a.system == *s)) {
                out.entry(rule.category)
                    .or_default()
                    .extend(rule.advice.iter().map(|a| a.to_string()));
            }
        }
        out
    }

    /// Reported lifestyle factors that act on an involved system, strongest
    /// combined effect first.
    ///
    /// Factor names match the graph's lifestyle keys, ignoring case.
    pub fn link_lifestyle_factors<'a>(
        &self,
        affected: &[SystemScore],
        factors: impl IntoIterator<Item = &'a str>,
    ) -> Vec<LifestyleLink> {
        let mut links = Vec::new();
        for factor in factors {
            let Some((name, impacts)) = self
                .graph()
                .lifestyle_impact
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(factor))
            else {
                continue;
            };
            for score in affected {
                if let Some(&impact) = impacts.get(&score.system) {
                    links.push(LifestyleLink {
                        factor: name.clone(),
                        system: score.system,
                        impact,
                        involvement: score.score,
                    });
                }
            }
        }
        links.sort_by(|a, b| desc(a.impact * a.involvement, b.impact * b.involvement));
        links
    }

    /// Full systems-level assessment of the reported symptoms.
    ///
    /// `lifestyle_factors` maps a factor name to what was said about it.
    pub fn generate_holistic_assessment<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        lifestyle_factors: &BTreeMap<String, Vec<String>>,
    ) -> HolisticAssessment {
        if symptoms.is_empty() {
            return HolisticAssessment {
                summary: NO_SYMPTOMS_FOR_ASSESSMENT.to_string(),
                ..Default::default()
            };
        }

        let affected = self.analyze_symptom_pattern(symptoms);
        let connections = self.explain_symptom_connections(symptoms);
        let patterns = connections.potential_patterns.clone();
        let interventions = self.suggest_lifestyle_interventions(&affected);
        let links = self.link_lifestyle_factors(&affected, lifestyle_factors.keys().map(String::as_str));
        let questions = self.suggest_related_questions::<S, &str>(symptoms, &[]);

        let mut parts = Vec::new();
        if !affected.is_empty() {
            let names: Vec<&str> = affected.iter().take(3).map(|s| s.system.as_str()).collect();
            parts.push(format!(
                "Your health concerns primarily involve the {} systems.",
                names.join(", ")
            ));
        }
        parts.push(connections.summary.clone());
        if !patterns.is_empty() {
            parts.push(format!(
                "Your symptoms suggest patterns consistent with {}.",
                pattern_names(&patterns, 2)
            ));
        }
        if !interventions.is_empty() {
            parts.push("A holistic approach to your health would include:".to_string());
            for (category, items) in &interventions {
                if let Some(first) = items.first() {
                    parts.push(format!("- {}: {}", category, first));
                }
            }
        }
        parts.push(HOLISTIC_CLOSING.to_string());

        HolisticAssessment {
            affected_systems: affected,
            symptom_connections: connections,
            potential_patterns: patterns,
            lifestyle_interventions: interventions,
            lifestyle_links: links,
            suggested_questions: questions,
            summary: parts.join(" "),
        }
    }
}

fn connection_summary(
    affected: &[SystemScore],
    connections: &[SymptomConnection],
    patterns: &[PatternMatch],
) -> String {
    let mut parts = Vec::new();

    if !affected.is_empty() {
        let systems: Vec<String> = affected
            .iter()
            .take(3)
            .map(|s| format!("{} ({:.2})", s.system, s.score))
            .collect();
        parts.push(format!(
            "Your symptoms primarily affect these body systems: {}.",
            systems.join(", ")
        ));
    }

    if !connections.is_empty() {
        let texts: Vec<String> = connections
            .iter()
            .take(3)
            .map(|c| {
                format!(
                    "{} and {} are connected through the {} systems",
                    c.symptom1,
                    c.symptom2,
                    shared_names(&c.shared_systems, 2)
                )
            })
            .collect();
        parts.push(format!(
            "Key connections between your symptoms: {}.",
            texts.join("; ")
        ));
    }

    if !patterns.is_empty() {
        let texts: Vec<String> = patterns
            .iter()
            .take(2)
            .map(|p| format!("{} ({:.2})", p.pattern, p.score))
            .collect();
        parts.push(format!(
            "Your symptoms may be related to these patterns: {}.",
            texts.join(", ")
        ));
    }

    parts.push(CONNECTION_CLOSING.to_string());
    parts.join(" ")
}

pub(crate) fn shared_names(systems: &[BodySystem], n: usize) -> String {
    systems
        .iter()
        .take(n)
        .map(BodySystem::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn pattern_names(patterns: &[PatternMatch], n: usize) -> String {
    patterns
        .iter()
        .take(n)
        .map(|p| p.pattern.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SystemsEngine {
        SystemsEngine::default()
    }

    #[test]
    fn test_empty_connections() {
        let report = engine().explain_symptom_connections::<&str>(&[]);
        assert_eq!(report.summary, NO_SYMPTOMS_TO_ANALYZE);
        assert!(report.symptom_connections.is_empty());
        assert!(report.affected_systems.is_empty());
    }

    #[test]
    fn test_headache_dizziness_connection() {
        let report = engine().explain_symptom_connections(&["Headache", "Dizziness"]);
        assert_eq!(report.symptom_connections.len(), 1);
        let conn = &report.symptom_connections[0];
        // Shared: Neurological 0.72, Cardiovascular 0.42, Endocrine 0.20.
        assert_eq!(
            conn.shared_systems,
            vec![
                BodySystem::Neurological,
                BodySystem::Cardiovascular,
                BodySystem::Endocrine
            ]
        );
        assert!((conn.connection_strength - (0.72 + 0.42 + 0.2) / 3.0).abs() < 1e-9);
        assert!(report.summary.starts_with(
            "Your symptoms primarily affect these body systems: Neurological (1.00)"
        ));
        assert!(report.summary.contains(
            "Headache and Dizziness are connected through the Neurological, Cardiovascular systems"
        ));
        assert!(report.summary.ends_with(CONNECTION_CLOSING));
    }

    #[test]
    fn test_repeated_symptom_never_pairs_with_itself() {
        let report = engine().explain_symptom_connections(&["Headache", "Headache", "Dizziness"]);
        assert_eq!(report.symptom_connections.len(), 1);
        assert!(report
            .symptom_connections
            .iter()
            .all(|c| c.symptom1 != c.symptom2));
        assert_eq!(report.symptom_systems.len(), 2);

        let single = engine().explain_symptom_connections(&["Cough", "Cough"]);
        assert!(single.symptom_connections.is_empty());
    }

    #[test]
    fn test_unknown_symptoms_yield_closing_only() {
        let report = engine().explain_symptom_connections(&["Hiccups"]);
        assert_eq!(report.summary, CONNECTION_CLOSING);
        assert!(report.symptom_systems.is_empty());
    }

    #[test]
    fn test_interventions_keyed_by_systems() {
        let e = engine();
        let affected = vec![SystemScore {
            system: BodySystem::Cardiovascular,
            score: 1.0,
        }];
        let out = e.suggest_lifestyle_interventions(&affected);
        assert_eq!(
            out.keys().copied().collect::<Vec<_>>(),
            vec![Diet, Sleep, Exercise, StressManagement]
        );
        assert_eq!(
            out[&Diet],
            vec![
                "Reduce sodium intake and increase potassium-rich foods".to_string(),
                "Include heart-healthy fats like olive oil and avocados".to_string()
            ]
        );
        assert!(e.suggest_lifestyle_interventions(&[]).is_empty());
    }

    #[test]
    fn test_holistic_assessment_summary() {
        let e = engine();
        let factors: BTreeMap<String, Vec<String>> =
            [("sleep".to_string(), vec!["wakes at 3am".to_string()])]
                .into_iter()
                .collect();
        let assessment = e.generate_holistic_assessment(&["Headache", "Fatigue"], &factors);
        assert!(assessment
            .summary
            .starts_with("Your health concerns primarily involve the "));
        assert!(assessment
            .summary
            .contains("A holistic approach to your health would include: - Diet: "));
        assert!(assessment.summary.ends_with(HOLISTIC_CLOSING));
        assert!(assessment.lifestyle_links.iter().all(|l| l.factor == "Sleep"));
        assert!(!assessment.lifestyle_links.is_empty());
        assert!(assessment.suggested_questions.len() <= 5);
    }

    #[test]
    fn test_holistic_assessment_empty() {
        let assessment = engine().generate_holistic_assessment::<&str>(&[], &BTreeMap::new());
        assert_eq!(assessment.summary, NO_SYMPTOMS_FOR_ASSESSMENT);
        assert!(assessment.lifestyle_interventions.is_empty());
    }

    #[test]
    fn test_category_serializes_by_display_name() {
        assert_eq!(
            serde_json::to_string(&StressManagement).unwrap(),
            "\"Stress Management\""
        );
        assert_eq!(StressManagement.to_string(), "Stress Management");
    }
}
