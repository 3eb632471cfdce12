//! AI insight generation
//!
//! [`InsightProvider`] is the asynchronous text-to-text collaborator;
//! [`InsightService`] wires it to the annotation store's cache with the
//! cache-first, request-on-miss contract.

mod provider;
mod service;
mod types;

pub use provider::{InsightProvider, OllamaProvider};
pub use service::InsightService;
pub use types::{InsightError, Result};
