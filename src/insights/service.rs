//! Cache-first insight retrieval
//!
//! The reader asks for an insight on selected text; the store is consulted
//! first, and only a miss reaches the provider. Successful responses are
//! recorded before being surfaced, so repeat requests for the same selection
//! are served from cache.
//!
//! Concurrent identical requests are not coalesced here; callers should keep
//! at most one in flight per `(document, text)` key. The store's
//! last-write-wins overwrite keeps late duplicates harmless.

use std::sync::Arc;

use super::provider::InsightProvider;
use super::types::Result;
use crate::annotations::{AiInsight, AnnotationStore};

/// Wires the annotation store's insight cache to an insight provider.
#[derive(Clone)]
pub struct InsightService {
    store: AnnotationStore,
    provider: Arc<dyn InsightProvider>,
}

impl InsightService {
    pub fn new(store: AnnotationStore, provider: Arc<dyn InsightProvider>) -> Self {
        Self { store, provider }
    }

    /// Insight for the selected text: cached if available, freshly generated
    /// and recorded otherwise.
    ///
    /// Provider failures propagate and leave no cache entry. If the active
    /// document changes while a request is in flight, the result still lands
    /// under its original `(document, text)` key, which is correct: the key
    /// is document-and-text-scoped, not session-scoped.
    pub async fn insight_for(&self, document_id: &str, text: &str) -> Result<AiInsight> {
        if let Some(cached) = self.store.get_insight(document_id, text).await {
            tracing::debug!(document_id, "Insight served from cache");
            return Ok(cached);
        }

        let generated = self.provider.request_insight(text).await?;
        Ok(self.store.record_insight(document_id, text, &generated).await)
    }

    /// Whether the underlying provider is reachable.
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }
}
