//! File-based store: one JSON file per saved document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, Page};

use super::DocumentSink;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// A saved document as read back from disk.
///
/// Timestamps stay in the ISO-8601 form they were written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    pub filename: String,
    pub source_path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub processed_at: Option<String>,
    pub pages: Vec<Page>,
}

/// Writes documents as `<stem>_<YYYYMMDD_HHMMSS>.json` into one directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    output_dir: PathBuf,
    format: JsonFormat,
}

impl JsonStore {
    /// Create a store rooted at `output_dir`, creating the directory tree.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            format: JsonFormat::default(),
        })
    }

    /// Set the output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a document stamped with the current time.
    pub fn save(&self, doc: &Document) -> Result<PathBuf> {
        self.save_at(doc, Utc::now())
    }

    /// Save a document stamped with `processed_at`.
    ///
    /// A second save of the same file name within the same second overwrites
    /// the first.
    pub fn save_at(&self, doc: &Document, processed_at: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(artifact_name(&doc.stem(), processed_at));

        let stamped = doc.stamped(processed_at);
        let mut writer = BufWriter::new(File::create(&path)?);
        match self.format {
            JsonFormat::Pretty => serde_json::to_writer_pretty(&mut writer, &stamped)?,
            JsonFormat::Compact => serde_json::to_writer(&mut writer, &stamped)?,
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        log::info!("Saved {} to {}", doc.filename, path.display());
        Ok(path)
    }

    /// Read a previously saved document.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<JsonDocument> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Paths of every saved document, sorted by name.
    ///
    /// A missing output directory has nothing in it.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.output_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl DocumentSink for JsonStore {
    fn name(&self) -> &str {
        "json"
    }

    fn save_at(&self, doc: &Document, processed_at: DateTime<Utc>) -> Result<String> {
        JsonStore::save_at(self, doc, processed_at).map(|path| path.display().to_string())
    }
}

/// `<stem>_<YYYYMMDD_HHMMSS>.json`
fn artifact_name(stem: &str, processed_at: DateTime<Utc>) -> String {
    format!("{}_{}.json", stem, processed_at.format("%Y%m%d_%H%M%S"))
}
