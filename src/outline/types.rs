//! Outline types
//!
//! Data shapes crossing the analysis-backend boundary: flat leveled heading
//! records in, nested outline trees out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A flat heading record as emitted by document analysis.
///
/// Sequence order is document reading order. `level` is a tag like `"H2"`;
/// it is parsed, not trusted, when the tree is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRecord {
    /// Heading text
    pub text: String,
    /// Heading level tag ("H1".."H6")
    pub level: String,
    /// 1-based page number
    pub page: u32,
}

impl HeadingRecord {
    pub fn new(text: impl Into<String>, level: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            level: level.into(),
            page,
        }
    }
}

/// A node in the nested table-of-contents tree.
///
/// Children always have a strictly greater level than their parent; sibling
/// order preserves input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    /// Document-scoped id: `"{document_id}-{input_index}"`
    pub id: String,
    /// Heading text
    pub title: String,
    /// Parsed level, 1..=6
    pub level: u8,
    /// 1-based page number
    pub page: u32,
    /// Nested children
    pub children: Vec<OutlineNode>,
}

/// Outline construction errors
#[derive(Debug, Error)]
pub enum OutlineError {
    /// Level tag did not parse to an integer in 1..=6
    #[error("Malformed heading level: {0:?}")]
    MalformedLevel(String),
}

/// Result type alias for outline operations
pub type Result<T> = std::result::Result<T, OutlineError>;
