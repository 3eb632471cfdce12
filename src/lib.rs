//! DocuSense reading-session core
//!
//! The stateful heart of a document-reading interface, kept free of any UI
//! framework: outline construction, heading detection, per-document
//! annotations, and cached AI insights.
//!
//! # Modules
//!
//! - `outline`: heading detection over extracted lines and flat-to-nested
//!   table-of-contents construction
//! - `annotations`: per-document highlights and insight cache with an
//!   injected persistence collaborator
//! - `insights`: the asynchronous insight-request collaborator and the
//!   cache-first retrieval flow
//! - `library`: session catalog of uploaded documents
//!
//! Rendering, text selection, routing, and authentication are external
//! collaborators and deliberately absent.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docusense_core::annotations::{AnnotationStore, FilePersistence};
//! use docusense_core::config::Config;
//! use docusense_core::insights::{InsightService, OllamaProvider};
//! use docusense_core::outline::build_outline;
//!
//! let config = Config::from_env();
//! let persistence = FilePersistence::new(&config.storage.annotations_dir)?;
//! let store = AnnotationStore::new(persistence);
//! let insights = InsightService::new(
//!     store.clone(),
//!     Arc::new(OllamaProvider::from_config(&config.insight)),
//! );
//!
//! let tree = build_outline(&doc.id, &doc.outline)?;
//! let note = insights.insight_for(&doc.id, "selected text").await?;
//! ```

pub mod annotations;
pub mod config;
pub mod insights;
pub mod library;
pub mod outline;
