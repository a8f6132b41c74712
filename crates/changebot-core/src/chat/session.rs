//! Chat session controller.
//!
//! `ChatSession` owns one transcript and drives the request/response cycle:
//! append the user turn, exchange with the webhook, append exactly one
//! assistant turn. The submit is split into `begin_submit` / `finish_submit`
//! so callers that share a session across tasks never hold a lock across the
//! network call.

use changebot_types::chat::{GENERIC_ERROR_REPLY, SessionSummary, Turn};
use changebot_types::error::{ExchangeError, SessionError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::chat::extract::{extract_display_text, is_empty_body};
use crate::webhook::client::WebhookClient;

/// Token for an exchange started by [`ChatSession::begin_submit`].
#[derive(Debug, Clone)]
pub struct PendingExchange {
    user_turn: Turn,
    generation: u64,
}

impl PendingExchange {
    /// The text to send to the webhook.
    pub fn query(&self) -> &str {
        &self.user_turn.content
    }
}

/// Result of one completed interaction cycle.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub user: Turn,
    pub assistant: Turn,
    /// Set when the exchange failed; `assistant` then holds the generic reply.
    pub error: Option<ExchangeError>,
}

/// One user's conversation with the webhook.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    transcript: Vec<Turn>,
    pending: bool,
    /// Bumped by `clear`; replies to exchanges started earlier are dropped.
    generation: u64,
}

impl ChatSession {
    /// Create an empty session with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            transcript: Vec::new(),
            pending: false,
            generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Turns in display order.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Whether an exchange is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            turn_count: self.transcript.len(),
            pending: self.pending,
        }
    }

    /// Append the user turn and mark the session pending.
    ///
    /// Rejects blank input and overlapping submissions. The user text is
    /// stored exactly as given.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingExchange, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.pending {
            return Err(SessionError::Busy);
        }

        let user_turn = Turn::user(text);
        self.transcript.push(user_turn.clone());
        self.pending = true;

        Ok(PendingExchange {
            user_turn,
            generation: self.generation,
        })
    }

    /// Append the assistant turn for a finished exchange and clear the pending flag.
    ///
    /// Failures become the generic error reply. If the transcript was cleared
    /// while the exchange was in flight the reply is not appended, keeping
    /// user and assistant turns paired.
    pub fn finish_submit(
        &mut self,
        pending: PendingExchange,
        result: Result<Value, ExchangeError>,
    ) -> SubmitOutcome {
        self.pending = false;

        let result = result.and_then(|body| {
            if is_empty_body(&body) {
                Err(ExchangeError::EmptyResponse)
            } else {
                Ok(body)
            }
        });

        let (assistant, error) = match result {
            Ok(body) => (Turn::assistant(extract_display_text(&body)), None),
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Webhook exchange failed");
                (Turn::assistant(GENERIC_ERROR_REPLY), Some(e))
            }
        };

        if pending.generation == self.generation {
            self.transcript.push(assistant.clone());
        } else {
            info!(session_id = %self.id, "Transcript cleared during exchange, dropping reply");
        }

        SubmitOutcome {
            user: pending.user_turn,
            assistant,
            error,
        }
    }

    /// Run one full interaction cycle against `client`.
    pub async fn submit<C: WebhookClient>(
        &mut self,
        client: &C,
        text: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        let pending = self.begin_submit(text)?;

        let span = info_span!(
            "webhook.exchange",
            session_id = %self.id,
            endpoint = client.endpoint(),
            query_len = pending.query().len(),
        );
        let result = client.exchange(pending.query()).instrument(span).await;

        Ok(self.finish_submit(pending, result))
    }

    /// Empty the transcript. Always succeeds; idempotent.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.generation += 1;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
