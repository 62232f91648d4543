//! Core types for VitaSim: conversation turns, history, and the immutable
//! session configuration sent along with every remote call.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HistoryError};

// ─────────────────────────────────────────────
// Turns
// ─────────────────────────────────────────────

/// Who sent a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

// ─────────────────────────────────────────────
// Conversation history
// ─────────────────────────────────────────────

/// Ordered few-shot history replayed into every new chat session.
///
/// Only grows by whole exchanges (user turn immediately followed by the
/// assistant turn), so `len()` is always even.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a training exchange. Rejects empty or whitespace-only text
    /// without touching the history.
    pub fn push_exchange(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> Result<(), HistoryError> {
        let user_text = user_text.into();
        let assistant_text = assistant_text.into();

        if user_text.trim().is_empty() {
            return Err(HistoryError::EmptyUserText);
        }
        if assistant_text.trim().is_empty() {
            return Err(HistoryError::EmptyAssistantText);
        }

        self.turns.push(Turn::user(user_text));
        self.turns.push(Turn::assistant(assistant_text));
        Ok(())
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns = Vec::new();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of complete exchanges (`len / 2`, rounded down).
    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

// ─────────────────────────────────────────────
// Safety settings
// ─────────────────────────────────────────────

/// Content category a safety threshold applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_CIVIC_INTEGRITY")]
    CivicIntegrity,
}

/// Minimum severity at which content in a category is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
    Off,
}

/// A single category → threshold pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }
}

/// Safety settings applied when none are configured.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    vec![SafetySetting::new(
        HarmCategory::DangerousContent,
        HarmBlockThreshold::BlockMediumAndAbove,
    )]
}

// ─────────────────────────────────────────────
// Session configuration
// ─────────────────────────────────────────────

/// MIME type asking the model for JSON-only output.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Everything sent alongside the history on each remote call.
///
/// Built once at startup and shared behind an `Arc`; there are no setters
/// after construction, only the consuming `with_*` builders.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfiguration {
    id: String,
    instruction: String,
    response_mime_type: String,
    safety_settings: Vec<SafetySetting>,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
}

impl SessionConfiguration {
    /// Create a configuration for model `id` with the given instruction text.
    ///
    /// Defaults to JSON output and [`default_safety_settings`].
    pub fn new(id: impl Into<String>, instruction: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let instruction = instruction.into();

        if id.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if instruction.trim().is_empty() {
            return Err(ConfigError::EmptyInstruction);
        }

        Ok(Self {
            id,
            instruction,
            response_mime_type: JSON_MIME_TYPE.to_string(),
            safety_settings: default_safety_settings(),
            temperature: None,
            max_output_tokens: None,
        })
    }

    pub fn with_response_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.response_mime_type = mime_type.into();
        self
    }

    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = settings;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Configuration identifier (the model name).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn response_mime_type(&self) -> &str {
        &self.response_mime_type
    }

    pub fn safety_settings(&self) -> &[SafetySetting] {
        &self.safety_settings
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_exchange_appends_in_order() {
        let mut history = ConversationHistory::new();
        history.push_exchange("q1", "a1").unwrap();
        history.push_exchange("q2", "a2").unwrap();

        let turns = history.turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0], Turn::user("q1"));
        assert_eq!(turns[1], Turn::assistant("a1"));
        assert_eq!(turns[2], Turn::user("q2"));
        assert_eq!(turns[3], Turn::assistant("a2"));
    }

    #[test]
    fn test_length_is_twice_the_exchanges() {
        let mut history = ConversationHistory::new();
        for i in 0..7 {
            history
                .push_exchange(format!("q{i}"), format!("a{i}"))
                .unwrap();
        }
        assert_eq!(history.len(), 14);
        assert_eq!(history.exchanges(), 7);
    }

    #[test]
    fn test_push_exchange_rejects_empty_user_text() {
        let mut history = ConversationHistory::new();
        let err = history.push_exchange("   ", "answer").unwrap_err();
        assert_eq!(err, HistoryError::EmptyUserText);
        assert!(history.is_empty());
    }

    #[test]
    fn test_push_exchange_rejects_empty_assistant_text() {
        let mut history = ConversationHistory::new();
        history.push_exchange("q", "a").unwrap();
        let err = history.push_exchange("question", "").unwrap_err();
        assert_eq!(err, HistoryError::EmptyAssistantText);
        // Rejected pair leaves no half-exchange behind
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.push_exchange("q", "a").unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.exchanges(), 0);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn test_safety_setting_wire_names() {
        let json = serde_json::to_value(default_safety_settings()).unwrap();
        assert_eq!(json[0]["category"], "HARM_CATEGORY_DANGEROUS_CONTENT");
        assert_eq!(json[0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[test]
    fn test_configuration_defaults() {
        let config = SessionConfiguration::new("gemini-2.5-flash", "Be a patient.").unwrap();
        assert_eq!(config.id(), "gemini-2.5-flash");
        assert_eq!(config.response_mime_type(), JSON_MIME_TYPE);
        assert_eq!(config.safety_settings(), default_safety_settings().as_slice());
        assert!(config.temperature().is_none());
    }

    #[test]
    fn test_configuration_rejects_empty_instruction() {
        let err = SessionConfiguration::new("gemini-2.5-flash", " \n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyInstruction));
    }

    #[test]
    fn test_configuration_rejects_empty_model() {
        let err = SessionConfiguration::new("", "instruction").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyModel));
    }
}
