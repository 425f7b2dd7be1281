//! Body-system association scoring.
//!
//! The [`SystemsEngine`] reads a shared [`SystemGraph`] and answers
//! questions about which systems a set of symptoms touches, how those
//! systems relate, which multi-system patterns they resemble, and what to
//! ask about next. The graph's connections are mirrored once at
//! construction.

use ddx_config::{BodySystem, SystemGraph, SystemWeights};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Default minimum connection strength for related systems.
pub const RELATED_SYSTEM_THRESHOLD: f64 = 0.5;
/// Default minimum association for a symptom's systems.
pub const SYMPTOM_SYSTEM_THRESHOLD: f64 = 0.3;
/// Default minimum association for a system's symptoms.
pub const SYSTEM_SYMPTOM_THRESHOLD: f64 = 0.5;
/// Default minimum pattern match score.
pub const PATTERN_THRESHOLD: f64 = 0.6;

/// Involvement assumed for a related system no reported symptom touches.
const UNINVOLVED_SYSTEM_SCORE: f64 = 0.3;
/// Systems that seed follow-up suggestions.
const SEED_SYSTEMS: usize = 3;
/// Follow-up suggestions returned.
const MAX_RELATED_QUESTIONS: usize = 5;

/// A body system with a weight or score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SystemScore {
    pub system: BodySystem,
    pub score: f64,
}

/// A symptom with its association strength to some system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymptomWeight {
    pub symptom: String,
    pub strength: f64,
}

/// A multi-system pattern and how well the symptoms match it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatternMatch {
    pub pattern: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SystemsEngine {
    graph: Arc<SystemGraph>,
    connections: BTreeMap<(BodySystem, BodySystem), f64>,
}

impl Default for SystemsEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemGraph::default()))
    }
}

impl SystemsEngine {
    pub fn new(graph: Arc<SystemGraph>) -> Self {
        let connections = graph.mirrored_connections();
        SystemsEngine { graph, connections }
    }

    pub fn graph(&self) -> &SystemGraph {
        &self.graph
    }

    /// Symmetric connection strength, 0.0 when unconnected.
    pub fn connection(&self, from: BodySystem, to: BodySystem) -> f64 {
        self.connections.get(&(from, to)).copied().unwrap_or(0.0)
    }

    pub fn knows_symptom(&self, symptom: &str) -> bool {
        self.graph.symptom_systems.contains_key(symptom)
    }

    /// Systems connected to `system` with strength at or above `threshold`.
    pub fn get_related_systems(&self, system: BodySystem, threshold: f64) -> Vec<SystemScore> {
        let mut related: Vec<SystemScore> = self
            .connections
            .iter()
            .filter(|(&(from, _), &w)| from == system && w >= threshold)
            .map(|(&(_, to), &w)| SystemScore {
                system: to,
                score: w,
            })
            .collect();
        sort_scores(&mut related);
        related
    }

    /// Systems a symptom is associated with at or above `threshold`.
    pub fn get_systems_for_symptom(&self, symptom: &str, threshold: f64) -> Vec<SystemScore> {
        let Some(weights) = self.graph.systems_for(symptom) else {
            return Vec::new();
        };
        let mut systems: Vec<SystemScore> = weights
            .iter()
            .filter(|(_, &w)| w >= threshold)
            .map(|(&system, &w)| SystemScore { system, score: w })
            .collect();
        sort_scores(&mut systems);
        systems
    }

    /// Symptoms associated with a system at or above `threshold`.
    pub fn get_symptoms_for_system(&self, system: BodySystem, threshold: f64) -> Vec<SymptomWeight> {
        let mut symptoms: Vec<SymptomWeight> = self
            .graph
            .symptom_systems
            .iter()
            .filter_map(|(symptom, weights)| {
                let w = *weights.get(&system)?;
                (w >= threshold).then(|| SymptomWeight {
                    symptom: symptom.clone(),
                    strength: w,
                })
            })
            .collect();
        symptoms.sort_by(|a, b| desc(a.strength, b.strength));
        symptoms
    }

    /// Per-system impact of a lifestyle factor; empty for unknown factors.
    pub fn get_lifestyle_impact(&self, factor: &str) -> SystemWeights {
        self.graph
            .lifestyle_impact
            .get(factor)
            .cloned()
            .unwrap_or_default()
    }

    /// Impact of a lifestyle factor on one system; 0.0 when unknown.
    pub fn get_lifestyle_impact_on(&self, factor: &str, system: BodySystem) -> f64 {
        self.graph
            .lifestyle_impact
            .get(factor)
            .and_then(|w| w.get(&system))
            .copied()
            .unwrap_or(0.0)
    }

    /// Relative involvement of each system, scaled so the top one is 1.0.
    ///
    /// Unknown symptoms are ignored; a repeated symptom counts each time.
    pub fn analyze_symptom_pattern<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<SystemScore> {
        let mut totals: BTreeMap<BodySystem, f64> = BTreeMap::new();
        for symptom in symptoms {
            if let Some(weights) = self.graph.systems_for(symptom.as_ref()) {
                for (&system, &w) in weights {
                    *totals.entry(system).or_insert(0.0) += w;
                }
            }
        }
        ddx_math::scale_to_max(&mut totals);

        let mut scores: Vec<SystemScore> = totals
            .into_iter()
            .map(|(system, score)| SystemScore { system, score })
            .collect();
        sort_scores(&mut scores);
        scores
    }

    /// Patterns whose weighted overlap with the involvement reaches
    /// `threshold`, best first.
    pub fn identify_multi_system_patterns<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        threshold: f64,
    ) -> Vec<PatternMatch> {
        let involvement = as_map(&self.analyze_symptom_pattern(symptoms));
        self.match_patterns(&involvement, threshold)
    }

    pub(crate) fn match_patterns(
        &self,
        involvement: &BTreeMap<BodySystem, f64>,
        threshold: f64,
    ) -> Vec<PatternMatch> {
        let mut matches: Vec<PatternMatch> = self
            .graph
            .patterns
            .iter()
            .filter_map(|(name, weights)| {
                let total: f64 = weights.values().sum();
                if total <= 0.0 {
                    return None;
                }
                let score: f64 = weights
                    .iter()
                    .map(|(s, w)| involvement.get(s).copied().unwrap_or(0.0) * w)
                    .sum::<f64>()
                    / total;
                (score >= threshold).then(|| PatternMatch {
                    pattern: name.clone(),
                    score,
                })
            })
            .collect();
        matches.sort_by(|a, b| desc(a.score, b.score));
        matches
    }

    /// Scored follow-up symptoms, best first, excluding anything already
    /// reported or asked.
    ///
    /// The three most involved systems contribute their own symptoms; the
    /// systems connected to them contribute theirs, damped by connection
    /// strength. Each symptom keeps its best score.
    pub fn rank_related_symptoms<S: AsRef<str>, A: AsRef<str>>(
        &self,
        symptoms: &[S],
        asked: &[A],
    ) -> Vec<SymptomWeight> {
        let excluded: BTreeSet<&str> = symptoms
            .iter()
            .map(AsRef::as_ref)
            .chain(asked.iter().map(AsRef::as_ref))
            .collect();

        let involvement = self.analyze_symptom_pattern(symptoms);
        let involvement_map = as_map(&involvement);
        let seeds = &involvement[..involvement.len().min(SEED_SYSTEMS)];

        let mut best: BTreeMap<String, f64> = BTreeMap::new();
        let mut offer = |symptom: &str, score: f64| {
            if excluded.contains(symptom) {
                return;
            }
            let entry = best.entry(symptom.to_string()).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        };

        for seed in seeds {
            for sw in self.get_symptoms_for_system(seed.system, SYSTEM_SYMPTOM_THRESHOLD) {
                offer(&sw.symptom, sw.strength * seed.score);
            }
        }

        for seed in seeds {
            for related in self.get_related_systems(seed.system, RELATED_SYSTEM_THRESHOLD) {
                let involvement = involvement_map
                    .get(&related.system)
                    .copied()
                    .unwrap_or(UNINVOLVED_SYSTEM_SCORE);
                for sw in self.get_symptoms_for_system(related.system, SYSTEM_SYMPTOM_THRESHOLD) {
                    offer(&sw.symptom, sw.strength * related.score * (involvement + 0.5));
                }
            }
        }

        let mut ranked: Vec<SymptomWeight> = best
            .into_iter()
            .map(|(symptom, strength)| SymptomWeight { symptom, strength })
            .collect();
        ranked.sort_by(|a, b| desc(a.strength, b.strength));
        ranked
    }

    /// Up to five follow-up symptoms to ask about.
    pub fn suggest_related_questions<S: AsRef<str>, A: AsRef<str>>(
        &self,
        symptoms: &[S],
        asked: &[A],
    ) -> Vec<String> {
        self.rank_related_symptoms(symptoms, asked)
            .into_iter()
            .take(MAX_RELATED_QUESTIONS)
            .map(|sw| sw.symptom)
            .collect()
    }
}

pub(crate) fn as_map(scores: &[SystemScore]) -> BTreeMap<BodySystem, f64> {
    scores.iter().map(|s| (s.system, s.score)).collect()
}

/// Descending by score; callers feed input already in tie-break order.
fn sort_scores(scores: &mut [SystemScore]) {
    scores.sort_by(|a, b| desc(a.score, b.score));
}

pub(crate) fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
