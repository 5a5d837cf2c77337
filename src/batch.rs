//! Batch processing: extract every PDF in a directory and save it.
//!
//! Each file is handled on its own. A file that fails to extract or save is
//! recorded in the report and the batch moves on to the next one.
//!
//! # Example
//!
//! ```no_run
//! use pdfvault::{BatchEvent, BatchProcessor, Config, StorageMode};
//! use std::path::Path;
//!
//! fn main() -> pdfvault::Result<()> {
//!     let config = Config::from_env()?;
//!     let processor = BatchProcessor::new(StorageMode::Both, &config)?;
//!
//!     let report = processor.run_with(Path::new("./pdfs"), |event| {
//!         if let BatchEvent::FileFailed { path, error } = event {
//!             eprintln!("{}: {}", path.display(), error);
//!         }
//!     })?;
//!     println!("Processed {}/{}", report.processed, report.discovered);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::Config;
use crate::detect::discover_pdfs;
use crate::error::Result;
use crate::parser::{ExtractOptions, ExtractionWarning, PdfExtractor};
use crate::storage::{DatabaseStore, DocumentSink, JsonStore, StorageMode};

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Discovery finished.
    Started {
        /// Number of PDF files found
        total: usize,
    },

    /// A file is about to be extracted.
    FileStarted {
        /// 0-indexed position in the batch
        index: usize,
        path: PathBuf,
    },

    /// A file was extracted, possibly with degraded fields.
    Extracted {
        path: PathBuf,
        page_count: u32,
        warnings: Vec<ExtractionWarning>,
    },

    /// A file was saved to one sink.
    Saved {
        path: PathBuf,
        sink: String,
        location: String,
    },

    /// A file could not be extracted or saved.
    FileFailed { path: PathBuf, error: String },

    /// Every file has been handled.
    Finished(BatchReport),
}

/// A file the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// PDF files found in the input directory
    pub discovered: usize,
    /// Files extracted and saved to every sink
    pub processed: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Check if every discovered file was processed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.processed == self.discovered
    }
}

/// Extracts PDFs from a directory and hands each one to its sinks.
pub struct BatchProcessor {
    sinks: Vec<Box<dyn DocumentSink>>,
    options: ExtractOptions,
}

impl BatchProcessor {
    /// Create a processor writing to the stores `mode` selects.
    ///
    /// The JSON store always comes before the database.
    pub fn new(mode: StorageMode, config: &Config) -> Result<Self> {
        let mut sinks: Vec<Box<dyn DocumentSink>> = Vec::new();
        if mode.includes_json() {
            sinks.push(Box::new(JsonStore::new(&config.json_output_dir)?));
        }
        if mode.includes_database() {
            sinks.push(Box::new(DatabaseStore::open(&config.database_url())?));
        }
        Ok(Self::with_sinks(sinks))
    }

    /// Create a processor with explicit sinks, saved to in order.
    pub fn with_sinks(sinks: Vec<Box<dyn DocumentSink>>) -> Self {
        Self {
            sinks,
            options: ExtractOptions::default(),
        }
    }

    /// Set extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Process every PDF in `input_dir`.
    pub fn run(&self, input_dir: &Path) -> Result<BatchReport> {
        self.run_with(input_dir, |_| {})
    }

    /// Process every PDF in `input_dir`, reporting progress to `observer`.
    ///
    /// Only a missing input directory fails the run.
    pub fn run_with<F>(&self, input_dir: &Path, mut observer: F) -> Result<BatchReport>
    where
        F: FnMut(&BatchEvent),
    {
        let files = discover_pdfs(input_dir)?;
        if files.is_empty() {
            log::warn!("No PDF files found in {}", input_dir.display());
        }
        observer(&BatchEvent::Started { total: files.len() });

        let mut report = BatchReport {
            discovered: files.len(),
            ..Default::default()
        };

        for (index, path) in files.into_iter().enumerate() {
            observer(&BatchEvent::FileStarted {
                index,
                path: path.clone(),
            });

            match self.process_file(&path, &mut observer) {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    let error = e.to_string();
                    observer(&BatchEvent::FileFailed {
                        path: path.clone(),
                        error: error.clone(),
                    });
                    report.failures.push(BatchFailure { path, error });
                }
            }
        }

        log::info!(
            "Processed {}/{} files from {}",
            report.processed,
            report.discovered,
            input_dir.display()
        );
        observer(&BatchEvent::Finished(report.clone()));
        Ok(report)
    }

    /// Extract one file and save it to every sink, stopping at the first
    /// sink that fails.
    fn process_file<F>(&self, path: &Path, observer: &mut F) -> Result<()>
    where
        F: FnMut(&BatchEvent),
    {
        let extracted = PdfExtractor::open_with_options(path, self.options.clone())?.extract()?;
        let doc = &extracted.value;
        observer(&BatchEvent::Extracted {
            path: path.to_path_buf(),
            page_count: doc.page_count,
            warnings: extracted.warnings.clone(),
        });

        // One stamp per file, shared by every sink
        let processed_at = Utc::now();
        for sink in &self.sinks {
            let location = sink.save_at(doc, processed_at)?;
            observer(&BatchEvent::Saved {
                path: path.to_path_buf(),
                sink: sink.name().to_string(),
                location,
            });
        }
        Ok(())
    }
}
