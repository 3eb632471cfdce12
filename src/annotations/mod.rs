//! Highlights and cached AI insights, per document
//!
//! [`AnnotationStore`] owns every document's annotation set and delegates
//! durable storage to an injected [`AnnotationPersistence`] collaborator.
//! Export, import, and the persisted form all share one canonical JSON shape.

mod persistence;
mod store;
mod types;

pub use persistence::{AnnotationPersistence, FilePersistence, MemoryPersistence};
pub use store::AnnotationStore;
pub use types::{
    normalize_source, AiInsight, AnnotationError, DocumentAnnotationSet, Highlight, PageRegion,
    PersistenceError, Result,
};
