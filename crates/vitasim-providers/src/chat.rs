//! Chat session handle — the remote side's view of one conversation.
//!
//! A `ChatSession` is created from a snapshot of the local history. Each
//! successful send appends the exchange to the session's own turn record so
//! later sends carry it as context. The handle never reaches back into the
//! history it was built from; when that history changes the owner builds a
//! new session instead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use vitasim_core::types::{SessionConfiguration, Turn};

use crate::error::ProviderError;
use crate::traits::{GenerateRequest, LlmProvider};

pub struct ChatSession {
    provider: Arc<dyn LlmProvider>,
    configuration: Arc<SessionConfiguration>,
    /// History snapshot followed by every exchange sent through this handle.
    turns: Vec<Turn>,
    generation: u64,
    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.provider.display_name())
            .field("configuration", &self.configuration.id())
            .field("turns", &self.turns.len())
            .field("generation", &self.generation)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl ChatSession {
    /// Bind a new session to `history` and `configuration`.
    ///
    /// `generation` identifies this binding; owners bump it on every rebuild.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        configuration: Arc<SessionConfiguration>,
        history: &[Turn],
        generation: u64,
    ) -> Self {
        debug!(
            provider = provider.display_name(),
            turns = history.len(),
            generation,
            "Creating chat session"
        );
        ChatSession {
            provider,
            configuration,
            turns: history.to_vec(),
            generation,
            created_at: Utc::now(),
        }
    }

    /// Send `text` with the session's turns as context.
    ///
    /// On success the exchange is appended to this session's record. On
    /// failure the record is left as it was.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            configuration: &self.configuration,
            history: &self.turns,
            message: text,
        };
        let reply = self.provider.generate(&request).await?;

        self.turns.push(Turn::user(text));
        self.turns.push(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// Every turn this session will replay on the next send.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn configuration(&self) -> &SessionConfiguration {
        &self.configuration
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the message back and records how much history each call saw.
    struct EchoProvider {
        seen_history: Mutex<Vec<usize>>,
        fail: bool,
    }

    impl EchoProvider {
        fn new(fail: bool) -> Self {
            Self {
                seen_history: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ProviderError> {
            self.seen_history.lock().unwrap().push(request.history.len());
            if self.fail {
                return Err(ProviderError::Network("connection reset".to_string()));
            }
            Ok(format!("echo: {}", request.message))
        }

        fn display_name(&self) -> &str {
            "Echo"
        }
    }

    fn configuration() -> Arc<SessionConfiguration> {
        Arc::new(SessionConfiguration::new("test-model", "instruction").unwrap())
    }

    #[tokio::test]
    async fn test_send_appends_to_own_record() {
        let provider = Arc::new(EchoProvider::new(false));
        let history = vec![Turn::user("q"), Turn::assistant("a")];
        let mut session = ChatSession::new(provider.clone(), configuration(), &history, 1);

        let reply = session.send_message("hello").await.unwrap();
        assert_eq!(reply, "echo: hello");
        session.send_message("again").await.unwrap();

        assert_eq!(session.turns().len(), 6);
        assert_eq!(session.turns()[4], Turn::user("again"));
        // Second call saw the first exchange as context
        assert_eq!(*provider.seen_history.lock().unwrap(), vec![2, 4]);
        // The snapshot source is untouched
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_record_unchanged() {
        let provider = Arc::new(EchoProvider::new(true));
        let mut session = ChatSession::new(provider, configuration(), &[], 3);

        let err = session.send_message("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
        assert!(session.turns().is_empty());
        assert_eq!(session.generation(), 3);
    }
}
