//! Persistence collaborators for annotation sets
//!
//! The store never assumes a medium; it talks to an injected
//! [`AnnotationPersistence`] keyed by document id. Two implementations are
//! provided: in-memory (tests, ephemeral sessions) and one-JSON-file-per-
//! document on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::{DocumentAnnotationSet, PersistenceError};

/// Durable storage for per-document annotation sets.
#[async_trait]
pub trait AnnotationPersistence: Send + Sync {
    /// Load the stored set for a document, if any.
    async fn load(&self, document_id: &str)
        -> Result<Option<DocumentAnnotationSet>, PersistenceError>;

    /// Store a document's set, replacing any previous copy.
    async fn save(&self, set: &DocumentAnnotationSet) -> Result<(), PersistenceError>;

    /// Remove a document's stored set. Removing an absent set succeeds.
    async fn delete(&self, document_id: &str) -> Result<(), PersistenceError>;
}

/// In-memory persistence backed by serialized JSON strings.
///
/// Serializing even in memory keeps this implementation honest about what
/// survives a round trip through the durable form.
#[derive(Default)]
pub struct MemoryPersistence {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl AnnotationPersistence for MemoryPersistence {
    async fn load(
        &self,
        document_id: &str,
    ) -> Result<Option<DocumentAnnotationSet>, PersistenceError> {
        let entries = self.entries.read().await;
        match entries.get(document_id) {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| PersistenceError::Corrupt(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save(&self, set: &DocumentAnnotationSet) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string(set).map_err(|e| PersistenceError::Storage(e.to_string()))?;
        let mut entries = self.entries.write().await;
        entries.insert(set.document_id.clone(), json);
        Ok(())
    }

    async fn delete(&self, document_id: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.write().await;
        entries.remove(document_id);
        Ok(())
    }
}

/// Filesystem persistence: one `{document_id}.json` per document.
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    /// Create a filesystem persistence rooted at `dir`, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Arc<Self>, PersistenceError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Arc::new(Self { dir }))
    }

    fn path_for(&self, document_id: &str) -> PathBuf {
        // Document ids are UUIDs; anything else gets path separators stripped.
        let safe: String = document_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl AnnotationPersistence for FilePersistence {
    async fn load(
        &self,
        document_id: &str,
    ) -> Result<Option<DocumentAnnotationSet>, PersistenceError> {
        let path = self.path_for(document_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| PersistenceError::Corrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, set: &DocumentAnnotationSet) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string(set).map_err(|e| PersistenceError::Storage(e.to_string()))?;
        let path = self.path_for(&set.document_id);
        tokio::fs::write(&path, json).await?;
        Ok(())
    }

    async fn delete(&self, document_id: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(document_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
