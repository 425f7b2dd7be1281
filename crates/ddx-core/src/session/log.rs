//! Per-session record of what the patient has said.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reported, denied, and already-asked symptoms plus lifestyle mentions.
///
/// Each list is an ordered set in first-seen order. A symptom is never in
/// both `reported` and `denied`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportedSymptomLog {
    reported: Vec<String>,
    denied: Vec<String>,
    asked: Vec<String>,
    lifestyle: BTreeMap<String, Vec<String>>,
}

impl ReportedSymptomLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> &[String] {
        &self.reported
    }

    pub fn denied(&self) -> &[String] {
        &self.denied
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn lifestyle(&self) -> &BTreeMap<String, Vec<String>> {
        &self.lifestyle
    }

    /// Symptoms that should not be suggested again: asked or denied.
    pub fn covered(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.asked.iter().map(String::as_str).collect();
        for d in &self.denied {
            if !out.contains(&d.as_str()) {
                out.push(d);
            }
        }
        out
    }

    /// The patient's current answer for a symptom.
    pub fn answer(&self, symptom: &str) -> Option<bool> {
        if self.reported.iter().any(|s| s == symptom) {
            Some(true)
        } else if self.denied.iter().any(|s| s == symptom) {
            Some(false)
        } else {
            None
        }
    }

    /// Record an answer, moving the symptom between lists on a correction.
    /// Returns whether anything changed.
    pub fn record(&mut self, symptom: &str, present: bool) -> bool {
        if self.answer(symptom) == Some(present) {
            return false;
        }
        let (to, from) = if present {
            (&mut self.reported, &mut self.denied)
        } else {
            (&mut self.denied, &mut self.reported)
        };
        from.retain(|s| s != symptom);
        to.push(symptom.to_string());
        true
    }

    /// Returns false when the symptom was already marked.
    pub fn mark_asked(&mut self, symptom: &str) -> bool {
        if self.asked.iter().any(|s| s == symptom) {
            return false;
        }
        self.asked.push(symptom.to_string());
        true
    }

    pub fn record_lifestyle(&mut self, factor: &str, mention: &str) {
        self.lifestyle
            .entry(factor.to_string())
            .or_default()
            .push(mention.to_string());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
