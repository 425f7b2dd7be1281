//! Registry of live sessions for hosts that serve several users.

use std::collections::BTreeMap;
use std::sync::Arc;

use ddx_common::{Error, Result, SessionId};
use ddx_config::{ProbabilityTable, SystemGraph};
use tracing::debug;

use super::DiagnosticSession;
use crate::logging::LogContext;

/// Owns one [`DiagnosticSession`] per [`SessionId`]; the knowledge base is
/// shared by all of them.
#[derive(Debug)]
pub struct SessionRegistry {
    table: Arc<ProbabilityTable>,
    graph: Arc<SystemGraph>,
    run_id: String,
    sessions: BTreeMap<SessionId, DiagnosticSession>,
}

impl SessionRegistry {
    pub fn new(table: Arc<ProbabilityTable>, graph: Arc<SystemGraph>) -> Self {
        SessionRegistry {
            table,
            graph,
            run_id: crate::logging::generate_run_id(),
            sessions: BTreeMap::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Open a fresh session and return its ID.
    pub fn create(&mut self) -> SessionId {
        let mut id = SessionId::new();
        while self.sessions.contains_key(&id) {
            id = SessionId::new();
        }
        let ctx = LogContext::new(self.run_id.clone());
        let session = DiagnosticSession::with_id(
            id.clone(),
            Arc::clone(&self.table),
            Arc::clone(&self.graph),
            ctx,
        );
        self.sessions.insert(id.clone(), session);
        debug!(session_id = %id, open = self.sessions.len(), "session registered");
        id
    }

    pub fn get(&self, id: &SessionId) -> Result<&DiagnosticSession> {
        self.sessions.get(id).ok_or_else(|| not_found(id))
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Result<&mut DiagnosticSession> {
        self.sessions.get_mut(id).ok_or_else(|| not_found(id))
    }

    /// Close a session, handing it back to the caller.
    pub fn remove(&mut self, id: &SessionId) -> Result<DiagnosticSession> {
        let session = self.sessions.remove(id).ok_or_else(|| not_found(id))?;
        debug!(session_id = %id, open = self.sessions.len(), "session closed");
        Ok(session)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn not_found(id: &SessionId) -> Error {
    Error::SessionNotFound {
        session_id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            Arc::new(ProbabilityTable::default()),
            Arc::new(SystemGraph::default()),
        )
        .with_run_id("run-test")
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut reg = registry();
        let a = reg.create();
        let b = reg.create();
        assert_ne!(a, b);

        reg.get_mut(&a).unwrap().observe("Fever", true);
        assert_eq!(reg.get(&a).unwrap().engine().observed_symptoms().len(), 1);
        assert!(reg.get(&b).unwrap().engine().observed_symptoms().is_empty());
    }

    #[test]
    fn test_missing_session_is_an_error() {
        let mut reg = registry();
        let id = reg.create();
        reg.remove(&id).unwrap();
        assert!(reg.is_empty());

        let err = reg.get(&id).unwrap_err();
        assert!(matches!(err, Error::SessionNotFound { .. }));
        assert!(reg.remove(&id).is_err());
    }
}
