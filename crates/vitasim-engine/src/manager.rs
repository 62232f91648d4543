//! Session manager — owns the few-shot history and the chat session bound to it.
//!
//! Invariant: the chat session always replays exactly the local history.
//! Any history change (append, dataset load, clear) rebuilds the session
//! before the next send; there is no incremental update of a live session.
//! Interactive sends go through the session only and never grow the local
//! history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use vitasim_core::error::HistoryError;
use vitasim_core::types::{ConversationHistory, SessionConfiguration};
use vitasim_core::utils::truncate_string;
use vitasim_providers::{ChatSession, LlmProvider};

use crate::reply::{decode, Reply};

/// Characters of the instruction shown by [`SessionManager::stats`].
const INSTRUCTION_PREVIEW_CHARS: usize = 50;

/// Outcome of [`SessionManager::load_dataset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Read-only snapshot returned by [`SessionManager::stats`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    /// Training exchanges in the history (`len / 2`).
    pub exchanges: usize,
    /// Configuration identifier (the model name).
    pub configuration_id: String,
    /// First characters of the instruction text.
    pub instruction_preview: String,
    /// Generation of the live session, if one is bound.
    pub session_generation: Option<u64>,
    /// When the live session was bound.
    pub session_created_at: Option<DateTime<Utc>>,
}

pub struct SessionManager {
    provider: Arc<dyn LlmProvider>,
    configuration: Arc<SessionConfiguration>,
    history: ConversationHistory,
    session: Option<ChatSession>,
    /// Bumped every time a session is bound.
    generation: u64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("provider", &self.provider.display_name())
            .field("configuration", &self.configuration.id())
            .field("exchanges", &self.history.exchanges())
            .field("session", &self.session)
            .field("generation", &self.generation)
            .finish()
    }
}

impl SessionManager {
    /// Start with an empty history and a session bound to it.
    pub fn new(provider: Arc<dyn LlmProvider>, configuration: SessionConfiguration) -> Self {
        let mut manager = SessionManager {
            provider,
            configuration: Arc::new(configuration),
            history: ConversationHistory::new(),
            session: None,
            generation: 0,
        };
        manager.rebuild_session();
        info!(
            provider = manager.provider.display_name(),
            model = manager.configuration.id(),
            "Session manager initialized"
        );
        manager
    }

    /// Append one training exchange.
    ///
    /// No remote call is made. The bound session is dropped so the next send
    /// rebuilds it from the updated history.
    pub fn append_training_example(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> Result<(), HistoryError> {
        self.history.push_exchange(user_text, assistant_text)?;
        self.invalidate_session();
        Ok(())
    }

    /// Append every valid pair in order, skipping invalid ones, then rebuild
    /// the session once.
    pub fn load_dataset<I, Q, A>(&mut self, pairs: I) -> DatasetReport
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let mut report = DatasetReport::default();

        for (index, (question, answer)) in pairs.into_iter().enumerate() {
            let question: String = question.into();
            match self.append_training_example(question.as_str(), answer) {
                Ok(()) => {
                    report.loaded += 1;
                    debug!(
                        example = index + 1,
                        question = %truncate_string(&question, 50),
                        "Training example loaded"
                    );
                }
                Err(e) => {
                    report.skipped += 1;
                    warn!(example = index + 1, error = %e, "Skipping training example");
                }
            }
        }

        self.rebuild_session();
        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            exchanges = self.history.exchanges(),
            "Training dataset loaded"
        );
        report
    }

    /// Send `text` and decode the reply.
    ///
    /// Builds the session first if none is bound. Remote failures are logged
    /// and returned as [`Reply::Failed`]; nothing here panics or propagates.
    /// No timeout is applied; wrap the future to bound latency.
    pub async fn send_reply(&mut self, text: &str) -> Reply {
        let session = self.ensure_session();

        match session.send_message(text).await {
            Ok(completion) => decode(&completion).into(),
            Err(e) => {
                error!(error = %e, "API call failed");
                Reply::Failed(e)
            }
        }
    }

    /// [`send_reply`](Self::send_reply) rendered for display: pretty JSON,
    /// raw text, or an `Error: ...` line.
    pub async fn send_message(&mut self, text: &str) -> String {
        self.send_reply(text).await.to_string()
    }

    /// Drop all training and bind a fresh session with the same configuration.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.rebuild_session();
        info!("Conversation history and chat session cleared");
    }

    /// Drop the live session; the next send rebuilds it from the history.
    pub fn invalidate_session(&mut self) {
        if self.session.take().is_some() {
            debug!("Chat session invalidated");
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            exchanges: self.history.exchanges(),
            configuration_id: self.configuration.id().to_string(),
            instruction_preview: truncate_string(
                self.configuration.instruction().trim_start(),
                INSTRUCTION_PREVIEW_CHARS,
            ),
            session_generation: self.session.as_ref().map(ChatSession::generation),
            session_created_at: self.session.as_ref().map(ChatSession::created_at),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn configuration(&self) -> &SessionConfiguration {
        &self.configuration
    }

    /// The live session, if bound.
    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    fn rebuild_session(&mut self) {
        self.session = None;
        self.ensure_session();
    }

    fn ensure_session(&mut self) -> &mut ChatSession {
        let SessionManager {
            provider,
            configuration,
            history,
            session,
            generation,
        } = self;

        session.get_or_insert_with(|| {
            *generation += 1;
            info!(
                generation = *generation,
                turns = history.len(),
                "Chat session bound to history"
            );
            ChatSession::new(
                Arc::clone(provider),
                Arc::clone(configuration),
                history.turns(),
                *generation,
            )
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
