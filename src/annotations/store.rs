//! Per-document annotation store
//!
//! Owns every [`DocumentAnnotationSet`] for the process lifetime. Sets are
//! created lazily on first write, hydrated from the persistence collaborator
//! on first touch, and cleared explicitly by the caller.
//!
//! # Thread Safety
//!
//! State lives behind a `tokio::sync::RwLock`; the store is `Clone` and
//! cheap to share. No lock is ever held across an external await, so
//! synchronous operations stay available while an insight request is in
//! flight elsewhere.
//!
//! # Persistence policy
//!
//! Saves are best-effort: a failed save is logged and in-memory state stays
//! authoritative for the session. The next successful save reconciles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::persistence::AnnotationPersistence;
use super::types::{
    normalize_source, AiInsight, AnnotationError, DocumentAnnotationSet, Highlight, PageRegion,
    Result,
};

/// Client-side store of text highlights and cached AI insights, keyed by
/// document identity.
#[derive(Clone)]
pub struct AnnotationStore {
    sets: Arc<RwLock<HashMap<String, DocumentAnnotationSet>>>,
    persistence: Arc<dyn AnnotationPersistence>,
}

impl AnnotationStore {
    /// Create a store over an injected persistence collaborator.
    pub fn new(persistence: Arc<dyn AnnotationPersistence>) -> Self {
        Self {
            sets: Arc::new(RwLock::new(HashMap::new())),
            persistence,
        }
    }

    /// Create and append a highlight for a document, creating the set if
    /// absent, and persist the updated set.
    pub async fn add_highlight(
        &self,
        document_id: &str,
        text: &str,
        page: u32,
        position: PageRegion,
    ) -> Highlight {
        self.hydrate(document_id).await;

        let highlight = Highlight::new(document_id, text, page, position);
        let snapshot = {
            let mut sets = self.sets.write().await;
            let set = sets
                .entry(document_id.to_string())
                .or_insert_with(|| DocumentAnnotationSet::new(document_id));
            set.highlights.push(highlight.clone());
            set.clone()
        };

        self.persist(&snapshot).await;
        highlight
    }

    /// Highlights for a document in creation order; empty if none exist.
    pub async fn get_highlights(&self, document_id: &str) -> Vec<Highlight> {
        self.hydrate(document_id).await;
        let sets = self.sets.read().await;
        sets.get(document_id)
            .map(|set| set.highlights.clone())
            .unwrap_or_default()
    }

    /// Cached insight for `(document, text)`, if present.
    ///
    /// Lookup is by whitespace-normalized text. A miss signals the caller to
    /// request a fresh insight; the store never requests one itself.
    pub async fn get_insight(&self, document_id: &str, text: &str) -> Option<AiInsight> {
        self.hydrate(document_id).await;
        let key = normalize_source(text);
        let sets = self.sets.read().await;
        sets.get(document_id)
            .and_then(|set| set.insight_for(&key))
            .cloned()
    }

    /// Insert or overwrite the cached insight for `(document, text)` and
    /// persist. Last writer wins.
    pub async fn record_insight(
        &self,
        document_id: &str,
        text: &str,
        insight_text: &str,
    ) -> AiInsight {
        self.hydrate(document_id).await;

        let insight = AiInsight::new(document_id, text, insight_text);
        let key = normalize_source(text);
        let snapshot = {
            let mut sets = self.sets.write().await;
            let set = sets
                .entry(document_id.to_string())
                .or_insert_with(|| DocumentAnnotationSet::new(document_id));
            match set
                .insights
                .iter_mut()
                .find(|existing| normalize_source(&existing.source_text) == key)
            {
                Some(existing) => *existing = insight.clone(),
                None => set.insights.push(insight.clone()),
            }
            set.clone()
        };

        self.persist(&snapshot).await;
        insight
    }

    /// Remove all annotations for a document from memory and persistence.
    /// Idempotent; clearing an unknown document succeeds silently.
    pub async fn clear_document(&self, document_id: &str) {
        {
            let mut sets = self.sets.write().await;
            sets.remove(document_id);
        }
        if let Err(e) = self.persistence.delete(document_id).await {
            tracing::warn!(document_id, error = %e, "Failed to delete persisted annotations");
        }
    }

    /// Canonical JSON form of a document's annotations.
    ///
    /// An unknown document exports an empty collection, not an error.
    pub async fn export_document(&self, document_id: &str) -> Result<String> {
        self.hydrate(document_id).await;
        let sets = self.sets.read().await;
        let set = match sets.get(document_id) {
            Some(set) => set.clone(),
            None => DocumentAnnotationSet::new(document_id),
        };
        Ok(serde_json::to_string(&set)?)
    }

    /// Parse an exported payload and merge it in, replacing any existing
    /// state for the same document, then persist.
    pub async fn import_document(&self, payload: &str) -> Result<()> {
        let set: DocumentAnnotationSet = serde_json::from_str(payload)
            .map_err(|e| AnnotationError::MalformedPayload(e.to_string()))?;
        if set.document_id.is_empty() {
            return Err(AnnotationError::MalformedPayload(
                "empty document id".to_string(),
            ));
        }

        {
            let mut sets = self.sets.write().await;
            sets.insert(set.document_id.clone(), set.clone());
        }
        self.persist(&set).await;
        Ok(())
    }

    /// Pull a document's set from persistence on first touch.
    ///
    /// Load failures degrade to an absent set; the session continues with
    /// whatever is in memory.
    async fn hydrate(&self, document_id: &str) {
        {
            let sets = self.sets.read().await;
            if sets.contains_key(document_id) {
                return;
            }
        }

        match self.persistence.load(document_id).await {
            Ok(Some(stored)) => {
                let mut sets = self.sets.write().await;
                // A writer may have created the set in the meantime; the
                // in-memory copy stays authoritative.
                sets.entry(document_id.to_string()).or_insert(stored);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(document_id, error = %e, "Failed to load persisted annotations");
            }
        }
    }

    /// Best-effort save; failures are logged, never propagated.
    async fn persist(&self, set: &DocumentAnnotationSet) {
        if let Err(e) = self.persistence.save(set).await {
            tracing::warn!(
                document_id = %set.document_id,
                error = %e,
                "Failed to persist annotations; in-memory state remains authoritative"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::persistence::MemoryPersistence;
    use async_trait::async_trait;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    /// Install a subscriber so best-effort failure paths emit visible events.
    /// Safe to call from every test; only the first install wins.
    fn init_tracing() {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "docusense_core=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    }

    fn region() -> PageRegion {
        PageRegion {
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.05,
        }
    }

    fn store() -> AnnotationStore {
        AnnotationStore::new(MemoryPersistence::new())
    }

    #[tokio::test]
    async fn test_add_then_get_returns_added_highlight() {
        let store = store();
        let added = store
            .add_highlight("doc-1", "first phrase", 2, region())
            .await;

        let highlights = store.get_highlights("doc-1").await;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0], added);
    }

    #[tokio::test]
    async fn test_highlights_kept_in_insertion_order() {
        let store = store();
        store.add_highlight("doc-1", "first", 1, region()).await;
        store.add_highlight("doc-1", "second", 5, region()).await;
        store.add_highlight("doc-1", "third", 3, region()).await;

        let texts: Vec<String> = store
            .get_highlights("doc-1")
            .await
            .into_iter()
            .map(|h| h.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_get_highlights_unknown_document_is_empty() {
        let store = store();
        assert!(store.get_highlights("nope").await.is_empty());
    }

    #[tokio::test]
    async fn test_insight_cache_hit_and_miss() {
        let store = store();
        assert!(store.get_insight("doc-1", "foo").await.is_none());

        store.record_insight("doc-1", "foo", "bar").await;
        let hit = store.get_insight("doc-1", "foo").await.unwrap();
        assert_eq!(hit.insight_text, "bar");

        // Other documents are independent.
        assert!(store.get_insight("doc-2", "foo").await.is_none());
    }

    #[tokio::test]
    async fn test_record_insight_last_write_wins() {
        let store = store();
        store.record_insight("doc-1", "foo", "bar").await;
        store.record_insight("doc-1", "foo", "baz").await;

        let hit = store.get_insight("doc-1", "foo").await.unwrap();
        assert_eq!(hit.insight_text, "baz");

        // Overwrite, not append.
        let export = store.export_document("doc-1").await.unwrap();
        let set: DocumentAnnotationSet = serde_json::from_str(&export).unwrap();
        assert_eq!(set.insights.len(), 1);
    }

    #[tokio::test]
    async fn test_insight_key_is_whitespace_normalized() {
        let store = store();
        store.record_insight("doc-1", "deep  reading", "note").await;
        assert!(store.get_insight("doc-1", " deep reading ").await.is_some());
    }

    #[tokio::test]
    async fn test_clear_document_removes_everything() {
        let persistence = MemoryPersistence::new();
        let store = AnnotationStore::new(persistence.clone());
        store.add_highlight("doc-1", "text", 1, region()).await;
        store.record_insight("doc-1", "foo", "bar").await;

        store.clear_document("doc-1").await;

        assert!(store.get_highlights("doc-1").await.is_empty());
        let export = store.export_document("doc-1").await.unwrap();
        let set: DocumentAnnotationSet = serde_json::from_str(&export).unwrap();
        assert!(set.is_empty());
        assert!(persistence.load("doc-1").await.unwrap().is_none());

        // Idempotent.
        store.clear_document("doc-1").await;
        store.clear_document("never-existed").await;
    }

    #[tokio::test]
    async fn test_export_import_export_is_byte_identical() {
        let store = store();
        store.add_highlight("doc-1", "alpha", 1, region()).await;
        store.add_highlight("doc-1", "beta", 2, region()).await;
        store.record_insight("doc-1", "gamma", "delta").await;

        let exported = store.export_document("doc-1").await.unwrap();

        let fresh = AnnotationStore::new(MemoryPersistence::new());
        fresh.import_document(&exported).await.unwrap();
        let re_exported = fresh.export_document("doc-1").await.unwrap();

        assert_eq!(exported, re_exported);
    }

    #[tokio::test]
    async fn test_export_unknown_document_is_empty_not_error() {
        let store = store();
        let exported = store.export_document("ghost").await.unwrap();
        let set: DocumentAnnotationSet = serde_json::from_str(&exported).unwrap();
        assert_eq!(set.document_id, "ghost");
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_import_replaces_same_document_state() {
        let store = store();
        store.add_highlight("doc-1", "old", 1, region()).await;

        let mut replacement = DocumentAnnotationSet::new("doc-1");
        replacement
            .highlights
            .push(Highlight::new("doc-1", "new", 9, region()));
        let payload = serde_json::to_string(&replacement).unwrap();

        store.import_document(&payload).await.unwrap();
        let highlights = store.get_highlights("doc-1").await;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "new");
    }

    #[tokio::test]
    async fn test_import_malformed_payload_leaves_state_unchanged() {
        let store = store();
        store.add_highlight("doc-1", "kept", 1, region()).await;

        let result = store.import_document(r#"{"highlights": "wrong"}"#).await;
        assert!(matches!(result, Err(AnnotationError::MalformedPayload(_))));

        let result = store.import_document("not json at all").await;
        assert!(matches!(result, Err(AnnotationError::MalformedPayload(_))));

        let highlights = store.get_highlights("doc-1").await;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "kept");
    }

    #[tokio::test]
    async fn test_hydrates_from_persistence_on_first_touch() {
        let persistence = MemoryPersistence::new();
        {
            let first_session = AnnotationStore::new(persistence.clone());
            first_session
                .add_highlight("doc-1", "survives restart", 4, region())
                .await;
        }

        let second_session = AnnotationStore::new(persistence);
        let highlights = second_session.get_highlights("doc-1").await;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "survives restart");
    }

    #[tokio::test]
    async fn test_add_highlight_merges_with_persisted_state() {
        let persistence = MemoryPersistence::new();
        {
            let first_session = AnnotationStore::new(persistence.clone());
            first_session
                .add_highlight("doc-1", "earlier", 1, region())
                .await;
        }

        let second_session = AnnotationStore::new(persistence);
        second_session
            .add_highlight("doc-1", "later", 2, region())
            .await;

        let texts: Vec<String> = second_session
            .get_highlights("doc-1")
            .await
            .into_iter()
            .map(|h| h.text)
            .collect();
        assert_eq!(texts, vec!["earlier", "later"]);
    }

    /// Persistence that always fails saves; mutations must still apply.
    struct FailingPersistence;

    #[async_trait]
    impl AnnotationPersistence for FailingPersistence {
        async fn load(
            &self,
            _document_id: &str,
        ) -> std::result::Result<Option<DocumentAnnotationSet>, crate::annotations::PersistenceError>
        {
            Ok(None)
        }

        async fn save(
            &self,
            _set: &DocumentAnnotationSet,
        ) -> std::result::Result<(), crate::annotations::PersistenceError> {
            Err(crate::annotations::PersistenceError::Storage(
                "disk full".to_string(),
            ))
        }

        async fn delete(
            &self,
            _document_id: &str,
        ) -> std::result::Result<(), crate::annotations::PersistenceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_authoritative() {
        init_tracing();
        let store = AnnotationStore::new(Arc::new(FailingPersistence));
        store.add_highlight("doc-1", "still here", 1, region()).await;

        let highlights = store.get_highlights("doc-1").await;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "still here");
    }
}
