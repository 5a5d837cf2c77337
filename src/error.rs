//! Error types for pdfvault.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfvault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or persisting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is empty or does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not recognize.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted with an unsupported scheme.
    #[error("Document is encrypted")]
    Encrypted,

    /// A source file could not be opened or parsed.
    #[error("Failed to extract '{}': {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// A store-level operation failed and was rolled back.
    ///
    /// Failing to connect is reported here too, with operation `"connect"`.
    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested input directory does not exist.
    #[error("Directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an error as an extraction failure for `path`.
    pub fn extraction(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Extraction {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a database error as a persistence failure.
    pub fn persistence(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Persistence {
            operation,
            source: source.into(),
        }
    }

    /// Check if this is an extraction failure.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Error::Extraction { .. })
    }

    /// Check if this is a persistence failure.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
