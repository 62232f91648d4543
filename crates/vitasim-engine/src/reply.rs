//! Completion text decoding.
//!
//! The remote is asked for JSON on every turn, but the closing summary is
//! allowed to be plain text. Decoding is therefore a two-armed outcome, not
//! an error path: [`Decoded::Structured`] when the text parses, otherwise
//! [`Decoded::Raw`] with the text untouched.

use serde_json::Value;
use tracing::debug;

use vitasim_providers::ProviderError;

/// Result of trying to read completion text as JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Structured(Value),
    Raw(String),
}

/// Decode `text` as a JSON document, falling back to the raw text.
pub fn decode(text: &str) -> Decoded {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Decoded::Structured(value),
        Err(e) => {
            debug!(error = %e, "Reply is not JSON, keeping raw text");
            Decoded::Raw(text.to_string())
        }
    }
}

/// What one `send` produced, ready for display.
#[derive(Debug)]
pub enum Reply {
    /// Parsed JSON; displayed pretty-printed.
    Structured(Value),
    /// Text that did not parse; displayed unchanged.
    Raw(String),
    /// The remote call failed; displayed as an error line.
    Failed(ProviderError),
}

impl Reply {
    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failed(_))
    }
}

impl From<Decoded> for Reply {
    fn from(decoded: Decoded) -> Self {
        match decoded {
            Decoded::Structured(value) => Reply::Structured(value),
            Decoded::Raw(text) => Reply::Raw(text),
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Structured(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| std::fmt::Error)?;
                f.write_str(&pretty)
            }
            Reply::Raw(text) => f.write_str(text),
            Reply::Failed(e) => write!(
                f,
                "Error: Could not get a response from the AI. Details: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object() {
        assert_eq!(decode(r#"{"a":1}"#), Decoded::Structured(json!({"a": 1})));
    }

    #[test]
    fn test_decode_plain_text() {
        assert_eq!(
            decode("Final summary: plain text"),
            Decoded::Raw("Final summary: plain text".to_string())
        );
    }

    #[test]
    fn test_decode_primitive_is_structured() {
        assert_eq!(decode("42"), Decoded::Structured(json!(42)));
    }

    #[test]
    fn test_decode_truncated_json_is_raw() {
        let text = r#"{"patient_id": "p1", "age": "#;
        assert_eq!(decode(text), Decoded::Raw(text.to_string()));
    }

    #[test]
    fn test_structured_renders_pretty() {
        let reply = Reply::from(decode(r#"{"a":1}"#));
        assert_eq!(reply.to_string(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_raw_renders_unchanged() {
        let reply = Reply::from(decode("  Final summary: plain text\n"));
        assert_eq!(reply.to_string(), "  Final summary: plain text\n");
    }

    #[test]
    fn test_failure_renders_error_marker() {
        let reply = Reply::Failed(ProviderError::Network("connection refused".to_string()));
        let text = reply.to_string();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("connection refused"));
        assert!(reply.is_failure());
    }
}
