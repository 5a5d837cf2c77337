//! Recoverable extraction problems.
//!
//! A damaged metadata field or page does not fail the document; it is
//! degraded to absent/empty and reported here alongside the result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable problem hit while extracting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// A metadata field could not be read and was left absent.
    Metadata { field: String, reason: String },

    /// A page's text could not be extracted and was left empty.
    Page { page_number: u32, reason: String },
}

impl ExtractionWarning {
    pub fn metadata(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractionWarning::Metadata {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn page(page_number: u32, reason: impl Into<String>) -> Self {
        ExtractionWarning::Page {
            page_number,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::Metadata { field, reason } => {
                write!(f, "metadata field '{}' skipped: {}", field, reason)
            }
            ExtractionWarning::Page {
                page_number,
                reason,
            } => write!(f, "page {} left empty: {}", page_number, reason),
        }
    }
}

/// A value produced alongside the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    pub value: T,
    pub warnings: Vec<ExtractionWarning>,
}

impl<T> Extracted<T> {
    /// Wrap a value with no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Check if any warning was raised.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Drop the warnings and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Warnings about the given page, if any.
    pub fn page_warnings(&self, page_number: u32) -> impl Iterator<Item = &ExtractionWarning> {
        self.warnings.iter().filter(move |w| {
            matches!(w, ExtractionWarning::Page { page_number: n, .. } if *n == page_number)
        })
    }
}
