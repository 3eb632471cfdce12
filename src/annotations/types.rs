//! Annotation types
//!
//! Highlights, cached AI insights, and the per-document set that owns both.
//! The set doubles as the canonical export/import and persistence JSON shape,
//! so export -> import -> export round-trips byte-identically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Normalized rectangle on a page (0-1 coordinates, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A user-marked span of document text, anchored to a page and region.
///
/// Immutable once created except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Unique identifier (UUID)
    pub id: String,
    /// The document this highlight belongs to
    pub document_id: String,
    /// The highlighted text
    pub text: String,
    /// 1-based page number
    pub page: u32,
    /// Where on the page the highlight sits
    pub position: PageRegion,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Highlight {
    pub fn new(document_id: &str, text: &str, page: u32, position: PageRegion) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.to_string(),
            text: text.to_string(),
            page,
            position,
            created_at: Utc::now(),
        }
    }
}

/// A cached AI-generated note for a piece of selected text.
///
/// Keyed within a document by normalized `source_text`; at most one cached
/// insight per distinct source text per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    /// The document this insight belongs to
    pub document_id: String,
    /// The selected text the insight was generated for
    pub source_text: String,
    /// The generated note
    pub insight_text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AiInsight {
    pub fn new(document_id: &str, source_text: &str, insight_text: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            source_text: source_text.to_string(),
            insight_text: insight_text.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// All highlights and insights belonging to one document.
///
/// This is also the serialized form produced by export, accepted by import,
/// and handed to the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentAnnotationSet {
    /// Owning document id
    pub document_id: String,
    /// Highlights in creation order
    pub highlights: Vec<Highlight>,
    /// Cached insights, one per distinct source text
    pub insights: Vec<AiInsight>,
}

impl DocumentAnnotationSet {
    pub fn new(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            highlights: Vec::new(),
            insights: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty() && self.insights.is_empty()
    }

    /// Find a cached insight by normalized source text.
    pub fn insight_for(&self, normalized_source: &str) -> Option<&AiInsight> {
        self.insights
            .iter()
            .find(|insight| normalize_source(&insight.source_text) == normalized_source)
    }
}

/// Collapse runs of whitespace and trim; the cache key for insights.
pub fn normalize_source(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Annotation store errors
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Import payload missing required fields or wrong types
    #[error("Malformed annotation payload: {0}")]
    MalformedPayload(String),

    /// Export serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence collaborator errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying medium failed (disk, remote)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored payload did not parse
    #[error("Corrupt stored payload: {0}")]
    Corrupt(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnotationError>;
