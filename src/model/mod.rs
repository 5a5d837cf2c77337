//! Document model types.
//!
//! The model is the interchange format between extraction and the stores:
//! the parser produces a [`Document`], and each store persists it.

mod document;
mod page;

pub use document::{Document, DocumentSummary, StoredDocument};
pub use page::Page;
