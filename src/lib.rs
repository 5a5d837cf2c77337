//! # pdfvault
//!
//! Extract text and metadata from PDF files and keep the results as JSON
//! files, relational records, or both.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfvault::{extract_file, DatabaseStore, JsonStore};
//!
//! fn main() -> pdfvault::Result<()> {
//!     let doc = extract_file("informe_enero.pdf")?;
//!     println!("{} pages", doc.page_count);
//!
//!     let path = JsonStore::new("./output_json")?.save(&doc)?;
//!     println!("Saved to {}", path.display());
//!
//!     let db = DatabaseStore::open("sqlite://./pdf_database.db")?;
//!     let id = db.save(&doc)?;
//!     assert!(db.get(id)?.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lenient extraction**: a damaged page or metadata field is reported as
//!   a warning instead of losing the document
//! - **Two stores**: timestamped JSON files and a two-table SQL schema
//! - **Batch processing**: one bad file never stops a directory run
//! - **PostgreSQL**: enable the `postgres` feature; SQLite is always bundled

pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod storage;

// Re-export commonly used types
pub use batch::{BatchEvent, BatchFailure, BatchProcessor, BatchReport};
pub use config::{Config, DatabaseConfig};
pub use detect::{discover_pdfs, has_pdf_extension, sniff_pdf_version};
pub use error::{Error, Result};
pub use model::{Document, DocumentSummary, Page, StoredDocument};
pub use parser::{ErrorMode, ExtractOptions, Extracted, ExtractionWarning, PdfExtractor};
pub use storage::{
    DatabaseStore, DatabaseUrl, DocumentSink, JsonDocument, JsonFormat, JsonStore, StorageMode,
};

use std::path::Path;

/// Extract a PDF file with default options.
///
/// Degraded pages and metadata fields are logged and left empty; use
/// [`extract_file_with_options`] to inspect them.
///
/// # Example
///
/// ```no_run
/// use pdfvault::extract_file;
///
/// let doc = extract_file("informe_enero.pdf").unwrap();
/// for page in &doc.pages {
///     println!("{}: {}", page.page_number, page.content);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Ok(PdfExtractor::open(path)?.extract()?.into_value())
}

/// Extract a PDF file with custom options, keeping the warnings.
///
/// # Example
///
/// ```no_run
/// use pdfvault::{extract_file_with_options, ExtractOptions};
///
/// let extracted = extract_file_with_options("scan.pdf", ExtractOptions::new().raw_text()).unwrap();
/// for warning in &extracted.warnings {
///     eprintln!("{}", warning);
/// }
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Extracted<Document>> {
    PdfExtractor::open_with_options(path, options)?.extract()
}
