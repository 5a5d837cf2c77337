//! PDF extraction module.

mod options;
mod pdf_parser;
mod warning;

pub use options::{ErrorMode, ExtractOptions};
pub use pdf_parser::PdfExtractor;
pub use warning::{Extracted, ExtractionWarning};
