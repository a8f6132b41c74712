//! Per-connection session registry.
//!
//! The REST API serves many users at once; each gets an isolated
//! `ChatSession` keyed by id. Each entry carries a `CancellationToken` so
//! tearing a session down aborts its in-flight exchange.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use changebot_types::chat::{SessionSummary, Turn};
use changebot_types::error::{ExchangeError, SessionError};
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::chat::session::{ChatSession, PendingExchange, SubmitOutcome};
use crate::webhook::client::WebhookClient;

struct SessionEntry {
    session: Mutex<ChatSession>,
    cancel: CancellationToken,
}

impl SessionEntry {
    /// Lock the session, recovering from poisoning. Session mutations never
    /// span a panic point, so the inner state stays consistent.
    fn lock(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An exchange that has been started but not finished.
///
/// Dropping it before [`InFlight::finish`] (the caller's future was
/// abandoned) completes the exchange as cancelled, so the session never
/// stays pending with an unanswered user turn.
struct InFlight {
    entry: Arc<SessionEntry>,
    pending: PendingExchange,
    armed: bool,
}

impl InFlight {
    fn finish(mut self, result: Result<serde_json::Value, ExchangeError>) -> SubmitOutcome {
        self.armed = false;
        self.entry.lock().finish_submit(self.pending.clone(), result)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            debug!("Submit abandoned while in flight");
            self.entry
                .lock()
                .finish_submit(self.pending.clone(), Err(ExchangeError::Cancelled));
        }
    }
}

/// Concurrent map of live chat sessions.
///
/// Cloning produces a shared view (backed by `Arc`).
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<Uuid, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty session.
    pub fn create(&self) -> SessionSummary {
        let session = ChatSession::new();
        let summary = session.summary();
        self.sessions.insert(
            summary.id,
            Arc::new(SessionEntry {
                session: Mutex::new(session),
                cancel: CancellationToken::new(),
            }),
        );
        info!(session_id = %summary.id, "Chat session created");
        summary
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Summaries of all live sessions, oldest first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| entry.value().lock().summary())
            .collect();
        summaries.sort_by_key(|s| s.started_at);
        summaries
    }

    pub fn summary(&self, id: &Uuid) -> Result<SessionSummary, SessionError> {
        Ok(self.entry(id)?.lock().summary())
    }

    /// A snapshot of the session's transcript.
    pub fn transcript(&self, id: &Uuid) -> Result<Vec<Turn>, SessionError> {
        Ok(self.entry(id)?.lock().transcript().to_vec())
    }

    /// Empty a session's transcript.
    pub fn clear(&self, id: &Uuid) -> Result<(), SessionError> {
        self.entry(id)?.lock().clear();
        debug!(session_id = %id, "Transcript cleared");
        Ok(())
    }

    /// Tear a session down, cancelling any exchange still in flight.
    pub fn remove(&self, id: &Uuid) -> Result<(), SessionError> {
        let (_, entry) = self.sessions.remove(id).ok_or(SessionError::NotFound)?;
        entry.cancel.cancel();
        info!(session_id = %id, "Chat session removed");
        Ok(())
    }

    /// Cancel every in-flight exchange and drop all sessions.
    pub fn shutdown(&self) {
        for entry in self.sessions.iter() {
            entry.value().cancel.cancel();
        }
        self.sessions.clear();
    }

    /// Run one interaction cycle on a session.
    ///
    /// The session lock is released while the request is in flight, so
    /// listing and clearing stay responsive. If the session is removed
    /// meanwhile, or the returned future is dropped, the exchange resolves to
    /// `ExchangeError::Cancelled`.
    pub async fn submit<C: WebhookClient>(
        &self,
        id: &Uuid,
        client: &C,
        text: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        let entry = self.entry(id)?;
        let pending = entry.lock().begin_submit(text)?;
        let cancel = entry.cancel.clone();
        let in_flight = InFlight {
            entry,
            pending,
            armed: true,
        };

        let span = info_span!(
            "webhook.exchange",
            session_id = %id,
            endpoint = client.endpoint(),
            query_len = in_flight.pending.query().len(),
        );
        let result = tokio::select! {
            result = client.exchange(in_flight.pending.query()).instrument(span) => result,
            _ = cancel.cancelled() => Err(ExchangeError::Cancelled),
        };

        Ok(in_flight.finish(result))
    }

    fn entry(&self, id: &Uuid) -> Result<Arc<SessionEntry>, SessionError> {
        self.sessions
            .get(id)
            .map(|e| Arc::clone(e.value()))
            .ok_or(SessionError::NotFound)
    }
}
