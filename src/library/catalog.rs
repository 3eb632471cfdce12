//! In-memory document catalog
//!
//! Tracks every document registered in the session and derives navigable
//! outline trees from their flat heading records.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::descriptor::DocumentDescriptor;
use crate::outline::{build_outline, OutlineNode, Result as OutlineResult};

/// Session-scoped catalog of registered documents.
#[derive(Clone, Default)]
pub struct DocumentCatalog {
    documents: Arc<RwLock<HashMap<String, DocumentDescriptor>>>,
}

impl DocumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any previous descriptor with the same id.
    pub async fn insert(&self, descriptor: DocumentDescriptor) {
        let mut documents = self.documents.write().await;
        documents.insert(descriptor.id.clone(), descriptor);
    }

    /// Look up a document by id.
    pub async fn get(&self, document_id: &str) -> Option<DocumentDescriptor> {
        let documents = self.documents.read().await;
        documents.get(document_id).cloned()
    }

    /// All documents, newest upload first.
    pub async fn list(&self) -> Vec<DocumentDescriptor> {
        let documents = self.documents.read().await;
        let mut all: Vec<DocumentDescriptor> = documents.values().cloned().collect();
        all.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        all
    }

    /// Remove a document. Returns whether anything was removed.
    pub async fn remove(&self, document_id: &str) -> bool {
        let mut documents = self.documents.write().await;
        documents.remove(document_id).is_some()
    }

    pub async fn len(&self) -> usize {
        let documents = self.documents.read().await;
        documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        let documents = self.documents.read().await;
        documents.is_empty()
    }

    /// Nested outline tree for a registered document.
    ///
    /// `None` for unknown documents; a build error means the outline should
    /// not be displayed at all for this document.
    pub async fn outline_tree(&self, document_id: &str) -> Option<OutlineResult<Vec<OutlineNode>>> {
        let documents = self.documents.read().await;
        documents
            .get(document_id)
            .map(|doc| build_outline(&doc.id, &doc.outline))
    }
}
