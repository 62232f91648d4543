//! Training datasets stored as JSON files.
//!
//! Accepted shapes (may be mixed within one array):
//! ```json
//! [
//!   { "question": "Specialty: Cardiology ...", "answer": "{\"patient_id\": ...}" },
//!   ["Specialty: Neurology ...", "{\"patient_id\": ...}"]
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetEntry {
    Object { question: String, answer: String },
    Pair(String, String),
}

impl From<DatasetEntry> for (String, String) {
    fn from(entry: DatasetEntry) -> Self {
        match entry {
            DatasetEntry::Object { question, answer } => (question, answer),
            DatasetEntry::Pair(question, answer) => (question, answer),
        }
    }
}

/// Read `(question, answer)` pairs from a JSON dataset file.
///
/// Pairs are returned as written; empty texts are not filtered here, the
/// session manager skips them when loading.
pub fn load_pairs(path: &Path) -> Result<Vec<(String, String)>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<DatasetEntry> =
        serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Read {} training pairs from {}", entries.len(), path.display());
    Ok(entries.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_object_and_pair_entries() {
        let file = write_temp_json(
            r#"[
                { "question": "q1", "answer": "a1" },
                ["q2", "a2"]
            ]"#,
        );
        let pairs = load_pairs(file.path()).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("q1".to_string(), "a1".to_string()),
                ("q2".to_string(), "a2".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_texts_are_kept() {
        let file = write_temp_json(r#"[{ "question": "", "answer": "a" }]"#);
        let pairs = load_pairs(file.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].0.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_pairs(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_temp_json(r#"{ "question": "not an array" }"#);
        let err = load_pairs(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse dataset"));
    }
}
