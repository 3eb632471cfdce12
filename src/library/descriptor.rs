//! Document descriptors
//!
//! The backend document interface: identity, display names, and the flat
//! outline records the analysis backend produced for the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outline::HeadingRecord;

/// A document known to the reading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    /// Unique document ID
    pub id: String,
    /// Uploaded file name
    pub name: String,
    /// Detected or supplied display title
    pub title: String,
    /// Detected language code, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Flat leveled heading records, in reading order
    pub outline: Vec<HeadingRecord>,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentDescriptor {
    /// Create a descriptor with a fresh id. Falls back to the file name when
    /// no title was detected.
    pub fn new(name: &str, title: Option<&str>, outline: Vec<HeadingRecord>) -> Self {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => name.to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            title,
            language: None,
            outline,
            uploaded_at: Utc::now(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }
}
