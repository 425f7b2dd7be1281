//! Diagnostic sessions: the adapter between a conversation host and the
//! two engines.
//!
//! A host extracts `(symptom, present)` observations from whatever the
//! patient says and feeds them to a [`DiagnosticSession`]. The session
//! forwards only new or changed answers to the Bayesian engine, keeps the
//! body-systems log in step, and recomputes the derived state (diagnosis
//! history, follow-up suggestions, affected systems) after every change.
//!
//! ```
//! use ddx_core::session::{DiagnosticSession, ObservationOutcome};
//!
//! let mut session = DiagnosticSession::with_defaults();
//! assert_eq!(session.observe("Fever", true), ObservationOutcome::Recorded);
//! assert_eq!(session.observe("Fever", true), ObservationOutcome::Unchanged);
//! println!("{}", session.next_question());
//! ```

pub mod log;
pub mod questions;
pub mod registry;
pub mod render;
pub mod report;

pub use log::ReportedSymptomLog;
pub use questions::{diagnostic_question, systems_question};
pub use registry::SessionRegistry;
pub use report::SessionReport;

use std::sync::Arc;

use ddx_common::SessionId;
use ddx_config::{ProbabilityTable, SystemGraph};
use serde::{Deserialize, Serialize};

use crate::config::ResolvedConfig;
use crate::decision::QuestionCandidate;
use crate::inference::{BayesianEngine, Diagnosis};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::systems::{
    append_unified_perspective, warrants_unified_perspective, CrossSpecialtyInsights,
    HolisticAssessment, SystemScore, SystemsEngine, PATTERN_THRESHOLD,
};

/// Diagnoses kept per history entry.
const HISTORY_DEPTH: usize = 3;
/// Bayesian follow-ups kept after each change.
const SUGGESTED_QUESTIONS: usize = 3;

/// What a single observation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationOutcome {
    /// First answer for this symptom.
    Recorded,
    /// The answer flipped; applied on top of the current beliefs.
    Corrected,
    /// Same answer as before; nothing changed.
    Unchanged,
    /// Neither engine knows the symptom.
    Unknown,
}

impl ObservationOutcome {
    /// Whether the observation changed session state.
    pub fn is_change(&self) -> bool {
        matches!(self, ObservationOutcome::Recorded | ObservationOutcome::Corrected)
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticSession {
    id: SessionId,
    engine: BayesianEngine,
    systems: SystemsEngine,
    log: ReportedSymptomLog,
    diagnosis_history: Vec<Vec<Diagnosis>>,
    suggested_questions: Vec<QuestionCandidate>,
    affected_systems: Vec<SystemScore>,
    systems_suggestions: Vec<String>,
    ctx: LogContext,
}

impl DiagnosticSession {
    pub fn new(table: Arc<ProbabilityTable>, graph: Arc<SystemGraph>) -> Self {
        Self::with_id(
            SessionId::new(),
            table,
            graph,
            LogContext::new(crate::logging::generate_run_id()),
        )
    }

    /// Session over the built-in knowledge base.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(ProbabilityTable::default()),
            Arc::new(SystemGraph::default()),
        )
    }

    /// Session over a loaded configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(Arc::clone(&config.table), Arc::clone(&config.graph))
    }

    pub(crate) fn with_id(
        id: SessionId,
        table: Arc<ProbabilityTable>,
        graph: Arc<SystemGraph>,
        ctx: LogContext,
    ) -> Self {
        let ctx = ctx.with_session_id(id.to_string());
        log_event!(ctx, DEBUG, event_names::SESSION_STARTED, Stage::Init, "session opened");
        DiagnosticSession {
            id,
            engine: BayesianEngine::new(table),
            systems: SystemsEngine::new(graph),
            log: ReportedSymptomLog::new(),
            diagnosis_history: Vec::new(),
            suggested_questions: Vec::new(),
            affected_systems: Vec::new(),
            systems_suggestions: Vec::new(),
            ctx,
        }
    }

    /// Replace the correlation context, keeping this session's ID on it.
    pub fn with_log_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx.with_session_id(self.id.to_string());
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn engine(&self) -> &BayesianEngine {
        &self.engine
    }

    pub fn systems(&self) -> &SystemsEngine {
        &self.systems
    }

    pub fn log(&self) -> &ReportedSymptomLog {
        &self.log
    }

    /// Top-3 diagnoses, one entry per change of leading disease.
    pub fn diagnosis_history(&self) -> &[Vec<Diagnosis>] {
        &self.diagnosis_history
    }

    pub fn suggested_questions(&self) -> &[QuestionCandidate] {
        &self.suggested_questions
    }

    pub fn affected_systems(&self) -> &[SystemScore] {
        &self.affected_systems
    }

    pub fn systems_suggestions(&self) -> &[String] {
        &self.systems_suggestions
    }

    /// Record one answer and refresh the derived state if it changed
    /// anything.
    pub fn observe(&mut self, symptom: &str, present: bool) -> ObservationOutcome {
        let outcome = self.apply(symptom, present);
        if outcome.is_change() {
            self.refresh();
        }
        outcome
    }

    /// Record several answers, refreshing once at the end.
    pub fn observe_batch<S: AsRef<str>>(&mut self, batch: &[(S, bool)]) -> Vec<ObservationOutcome> {
        let outcomes: Vec<ObservationOutcome> = batch
            .iter()
            .map(|(symptom, present)| self.apply(symptom.as_ref(), *present))
            .collect();
        if outcomes.iter().any(ObservationOutcome::is_change) {
            self.refresh();
        }
        outcomes
    }

    /// Start over with an intake form's answers.
    ///
    /// The history afterwards holds exactly one entry: the ranking after
    /// the whole batch.
    pub fn start_intake<S: AsRef<str>>(&mut self, batch: &[(S, bool)]) -> Vec<ObservationOutcome> {
        self.reset();
        let outcomes: Vec<ObservationOutcome> = batch
            .iter()
            .map(|(symptom, present)| self.apply(symptom.as_ref(), *present))
            .collect();
        self.refresh();
        log_event!(
            self.ctx,
            INFO,
            event_names::OBSERVE_INTAKE,
            Stage::Observe,
            "intake applied",
            answers = batch.len(),
            applied = outcomes.iter().filter(|o| o.is_change()).count()
        );
        outcomes
    }

    /// Note that a symptom has been asked about, so the systems view stops
    /// suggesting it. Returns false if it was already noted.
    pub fn mark_asked(&mut self, symptom: &str) -> bool {
        if !self.log.mark_asked(symptom) {
            return false;
        }
        self.refresh_systems_suggestions();
        true
    }

    pub fn record_lifestyle_factor(&mut self, factor: &str, mention: &str) {
        self.log.record_lifestyle(factor, mention);
    }

    /// Back to priors with an empty log and no suggestions.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.log.clear();
        self.diagnosis_history.clear();
        self.suggested_questions.clear();
        self.affected_systems.clear();
        self.systems_suggestions.clear();
        log_event!(self.ctx, DEBUG, event_names::SESSION_RESET, Stage::Init, "session reset");
    }

    fn apply(&mut self, symptom: &str, present: bool) -> ObservationOutcome {
        let in_table = self.engine.table().has_symptom(symptom);
        let in_graph = self.systems.knows_symptom(symptom);
        if !in_table && !in_graph {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::OBSERVE_UNKNOWN,
                Stage::Observe,
                "symptom not in knowledge base",
                symptom = symptom
            );
            return ObservationOutcome::Unknown;
        }

        let previous = self
            .engine
            .state()
            .observation(symptom)
            .or_else(|| self.log.answer(symptom));
        if previous == Some(present) {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::OBSERVE_UNCHANGED,
                Stage::Observe,
                "repeat answer ignored",
                symptom = symptom,
                present = present
            );
            return ObservationOutcome::Unchanged;
        }

        if in_table {
            self.engine.update_belief(symptom, present);
        }
        self.log.record(symptom, present);

        let outcome = if previous.is_none() {
            ObservationOutcome::Recorded
        } else {
            ObservationOutcome::Corrected
        };
        log_event!(
            self.ctx,
            DEBUG,
            event_names::OBSERVE_RECORDED,
            Stage::Observe,
            "observation applied",
            symptom = symptom,
            present = present,
            corrected = previous.is_some()
        );
        outcome
    }

    fn refresh(&mut self) {
        let top = self.engine.get_top_diagnoses(HISTORY_DEPTH);
        let leader_changed = match self.diagnosis_history.last() {
            None => true,
            Some(last) => {
                last.first().map(|d| d.disease.as_str()) != top.first().map(|d| d.disease.as_str())
            }
        };
        if leader_changed {
            if let Some(leader) = top.first() {
                log_event!(
                    self.ctx,
                    INFO,
                    event_names::INFER_LEADER_CHANGED,
                    Stage::Infer,
                    "leading diagnosis changed",
                    disease = leader.disease.as_str(),
                    probability = leader.probability
                );
            }
            self.diagnosis_history.push(top);
        }

        self.suggested_questions = self.engine.suggest_questions(SUGGESTED_QUESTIONS);
        self.affected_systems = self.systems.analyze_symptom_pattern(self.log.reported());
        self.refresh_systems_suggestions();
    }

    fn refresh_systems_suggestions(&mut self) {
        self.systems_suggestions = self
            .systems
            .suggest_related_questions(self.log.reported(), &self.log.covered());
        log_event!(
            self.ctx,
            DEBUG,
            event_names::SUGGEST_REFRESHED,
            Stage::Suggest,
            "suggestions refreshed",
            bayesian = self.suggested_questions.len(),
            systems = self.systems_suggestions.len()
        );
    }

    /// The most informative question to ask next.
    pub fn next_question(&self) -> String {
        diagnostic_question(self.suggested_questions.first().map(|q| q.symptom.as_str()))
    }

    /// The systems view's follow-up question.
    pub fn systems_next_question(&self) -> String {
        systems_question(self.systems_suggestions.first().map(String::as_str))
    }

    /// Markdown summary of the current assessment.
    pub fn diagnostic_summary(&self) -> String {
        render::diagnostic_summary(
            &self.engine.get_top_diagnoses(HISTORY_DEPTH),
            self.engine.observed_symptoms(),
            &self.suggested_questions,
        )
    }

    /// Markdown explanation of `disease`, or of the leading diagnosis.
    pub fn detailed_diagnosis(&self, disease: Option<&str>) -> String {
        let disease = match disease {
            Some(d) => d.to_string(),
            None => match self.engine.get_top_diagnoses(1).into_iter().next() {
                Some(top) => top.disease,
                None => return render::NO_DIAGNOSIS.to_string(),
            },
        };
        render::detailed_diagnosis(&self.engine.explain_reasoning(&disease))
    }

    /// Holistic assessment of the reported symptoms and lifestyle mentions.
    pub fn holistic_assessment(&self) -> HolisticAssessment {
        self.systems
            .generate_holistic_assessment(self.log.reported(), self.log.lifestyle())
    }

    pub fn cross_specialty_insights(&self) -> CrossSpecialtyInsights {
        self.systems.cross_specialty_insights(self.log.reported())
    }

    /// `response` with the unified-perspective section appended, when the
    /// reported symptoms involve at least two systems significantly.
    pub fn unified_perspective(&self, response: &str) -> Option<String> {
        if !warrants_unified_perspective(self.log.reported().len(), &self.affected_systems) {
            return None;
        }
        let insights = self.cross_specialty_insights();
        Some(append_unified_perspective(response, &insights))
    }

    /// Serializable snapshot of the session.
    pub fn report(&self, top_n: usize, questions_n: usize) -> SessionReport {
        log_event!(self.ctx, DEBUG, event_names::REPORT_BUILT, Stage::Report, "report built");
        SessionReport {
            session_id: self.id.clone(),
            generated_at: chrono::Utc::now(),
            observed: self.engine.observed_symptoms().to_vec(),
            top_diagnoses: self.engine.get_top_diagnoses(top_n),
            differential: self.engine.get_differential_diagnosis(top_n),
            entropy_bits: self.engine.entropy(),
            confidence: self.engine.get_confidence(),
            suggested_questions: self.engine.suggest_questions(questions_n),
            next_question: self.next_question(),
            diagnosis_history: self.diagnosis_history.clone(),
            reported_symptoms: self.log.reported().to_vec(),
            denied_symptoms: self.log.denied().to_vec(),
            affected_systems: self.affected_systems.clone(),
            potential_patterns: self
                .systems
                .identify_multi_system_patterns(self.log.reported(), PATTERN_THRESHOLD),
            systems_suggestions: self.systems_suggestions.clone(),
            systems_next_question: self.systems_next_question(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddx_config::BodySystem;

    fn session() -> DiagnosticSession {
        DiagnosticSession::with_defaults().with_log_context(LogContext::new("run-test"))
    }

    #[test]
    fn test_repeat_observation_is_a_noop() {
        let mut s = session();
        assert_eq!(s.observe("Fever", true), ObservationOutcome::Recorded);
        let before = s.engine().beliefs().clone();
        assert_eq!(s.observe("Fever", true), ObservationOutcome::Unchanged);
        assert_eq!(s.engine().beliefs(), &before);
        assert_eq!(s.engine().observed_symptoms().len(), 1);
    }

    #[test]
    fn test_correction_applies_sequentially() {
        let mut s = session();
        s.observe("Cough", true);
        assert_eq!(s.observe("Cough", false), ObservationOutcome::Corrected);
        assert_eq!(s.engine().state().observation("Cough"), Some(false));
        assert!(s.log().reported().is_empty());
        assert_eq!(s.log().denied(), ["Cough".to_string()]);
    }

    #[test]
    fn test_unknown_symptom() {
        let mut s = session();
        assert_eq!(s.observe("Hiccups", true), ObservationOutcome::Unknown);
        assert!(s.diagnosis_history().is_empty());
        assert!(s.engine().observed_symptoms().is_empty());
    }

    #[test]
    fn test_graph_only_symptom_feeds_systems_view() {
        let mut s = session();
        assert_eq!(s.observe("Dizziness", true), ObservationOutcome::Recorded);
        assert!(s.engine().observed_symptoms().is_empty());
        assert_eq!(s.log().reported(), ["Dizziness".to_string()]);
        assert_eq!(s.affected_systems()[0].system, BodySystem::Neurological);
    }

    #[test]
    fn test_history_grows_only_when_leader_changes() {
        let mut s = session();
        s.observe("Painful Urination", true);
        assert_eq!(s.diagnosis_history().len(), 1);
        assert_eq!(s.diagnosis_history()[0][0].disease, "UTI");

        s.observe("Frequent Urination", true);
        assert_eq!(s.diagnosis_history().len(), 1);
    }

    #[test]
    fn test_start_intake_resets_first() {
        let mut s = session();
        s.observe("Sneezing", true);
        s.observe("Itchy Eyes", true);

        let outcomes = s.start_intake(&[("Fever", true), ("Cough", true), ("Hiccups", true)]);
        assert_eq!(
            outcomes,
            vec![
                ObservationOutcome::Recorded,
                ObservationOutcome::Recorded,
                ObservationOutcome::Unknown
            ]
        );
        assert_eq!(s.engine().observed_symptoms().len(), 2);
        assert_eq!(s.diagnosis_history().len(), 1);
    }

    #[test]
    fn test_suggestions_skip_observed() {
        let mut s = session();
        s.observe_batch(&[("Fever", true), ("Cough", true)]);
        assert_eq!(s.suggested_questions().len(), 3);
        for q in s.suggested_questions() {
            assert!(!s.engine().state().is_observed(&q.symptom));
        }
        assert_ne!(s.next_question(), questions::DEFAULT_DIAGNOSTIC_QUESTION);
    }

    #[test]
    fn test_mark_asked_removes_systems_suggestion() {
        let mut s = session();
        s.observe("Headache", true);
        let first = s.systems_suggestions()[0].clone();
        assert!(s.mark_asked(&first));
        assert!(!s.systems_suggestions().contains(&first));
        assert!(!s.mark_asked(&first));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = session();
        s.observe("Fever", true);
        s.record_lifestyle_factor("Sleep", "poor");
        s.reset();
        assert!(s.engine().observed_symptoms().is_empty());
        assert!(s.diagnosis_history().is_empty());
        assert!(s.suggested_questions().is_empty());
        assert!(s.systems_suggestions().is_empty());
        assert!(s.log().lifestyle().is_empty());
        assert_eq!(s.next_question(), questions::DEFAULT_DIAGNOSTIC_QUESTION);
        assert_eq!(s.systems_next_question(), questions::DEFAULT_SYSTEMS_QUESTION);
    }

    #[test]
    fn test_detailed_diagnosis_defaults_to_leader() {
        let mut s = session();
        s.observe("Painful Urination", true);
        assert!(s.detailed_diagnosis(None).starts_with("## Detailed Analysis: UTI\n\n"));
        assert!(s
            .detailed_diagnosis(Some("Scurvy"))
            .contains(crate::inference::ledger::UNKNOWN_DISEASE_EXPLANATION));
    }

    #[test]
    fn test_unified_perspective_needs_two_symptoms() {
        let mut s = session();
        s.observe("Headache", true);
        assert!(s.unified_perspective("Thanks.").is_none());

        s.observe("Fatigue", true);
        s.observe("Joint Pain", true);
        let out = s.unified_perspective("Thanks.").unwrap();
        assert!(out.starts_with("Thanks.\n\n---\n\n**Unified Health Perspective:**"));
    }

    #[test]
    fn test_report_reflects_state() {
        let mut s = session();
        s.observe_batch(&[("Fever", true), ("Shortness of Breath", false)]);
        let report = s.report(5, 2);
        assert_eq!(report.session_id, *s.id());
        assert_eq!(report.top_diagnoses.len(), 5);
        assert_eq!(report.suggested_questions.len(), 2);
        assert_eq!(report.observed.len(), 2);
        assert_eq!(report.denied_symptoms, vec!["Shortness of Breath".to_string()]);
        assert!(report.summary_line().contains("2 observation(s)"));
    }
}
