//! Document-level types.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One extracted PDF: file identity, metadata and its pages in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Original base file name (e.g. "informe_enero.pdf")
    pub filename: String,

    /// Absolute path of the source at extraction time
    pub source_path: String,

    /// Number of pages reported by the source file
    pub page_count: u32,

    /// Document title from the info dictionary
    pub title: Option<String>,

    /// Document author from the info dictionary
    pub author: Option<String>,

    /// Creation date from the info dictionary
    pub created_at: Option<DateTime<Utc>>,

    /// Stamped by a store when the document is saved
    pub processed_at: Option<DateTime<Utc>>,

    /// Pages in document order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document for the given file.
    pub fn new(filename: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source_path: source_path.into(),
            page_count: 0,
            title: None,
            author: None,
            created_at: None,
            processed_at: None,
            pages: Vec::new(),
        }
    }

    /// Create a document describing the file at `path`.
    pub fn for_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::new(filename, path.to_string_lossy())
    }

    /// Get the number of pages held by the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Append the next page and keep `page_count` in step.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
        self.page_count = self.pages.len() as u32;
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// File name without its extension, used to name saved artifacts.
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.filename.clone())
    }

    /// Check that pages are numbered exactly `1..=page_count`.
    pub fn has_contiguous_pages(&self) -> bool {
        self.pages.len() as u32 == self.page_count
            && self
                .pages
                .iter()
                .enumerate()
                .all(|(i, page)| page.page_number == i as u32 + 1)
    }

    /// Return a copy stamped with the given processing time.
    pub fn stamped(&self, processed_at: DateTime<Utc>) -> Self {
        Self {
            processed_at: Some(processed_at),
            ..self.clone()
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Lightweight listing entry for a stored document; carries no page text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: i32,
    pub filename: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub processed_at: DateTime<Utc>,
}

/// A document read back from the relational store, with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i32,
    #[serde(flatten)]
    pub document: Document,
}
