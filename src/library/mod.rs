//! Document catalog
//!
//! Session-scoped registry of uploaded documents and their analysis results.
//! The catalog is the seam between the analysis backend's flat outline
//! records and the nested trees the reader navigates.

mod catalog;
mod descriptor;

pub use catalog::DocumentCatalog;
pub use descriptor::DocumentDescriptor;
