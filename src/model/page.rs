//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page's extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Extracted text; empty when the page has none or extraction failed
    pub content: String,
}

impl Page {
    /// Create a new page.
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }

    /// Create a page with no text.
    pub fn empty(page_number: u32) -> Self {
        Self::new(page_number, String::new())
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of whitespace-separated words on the page.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
