//! Persistence backends for extracted documents.
//!
//! Two interchangeable stores share the [`Document`] model: [`JsonStore`]
//! writes one file per saved document, [`DatabaseStore`] keeps documents and
//! pages in two related tables. Both implement [`DocumentSink`], which is all
//! the batch processor needs to know about them.

pub mod database;
pub mod json;

pub use database::{DatabaseStore, DatabaseUrl};
pub use json::{JsonDocument, JsonFormat, JsonStore};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::Document;

/// A destination that extracted documents can be saved to.
pub trait DocumentSink {
    /// Short name of this sink, used in progress output.
    fn name(&self) -> &str;

    /// Save `doc` stamped with `processed_at` and describe where it went.
    fn save_at(&self, doc: &Document, processed_at: DateTime<Utc>) -> Result<String>;
}

/// Which stores a batch writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// JSON files only
    #[default]
    Json,
    /// Relational database only
    Database,
    /// Both stores, JSON first
    Both,
}

impl StorageMode {
    /// Check if the JSON store is written.
    pub fn includes_json(self) -> bool {
        matches!(self, StorageMode::Json | StorageMode::Both)
    }

    /// Check if the database store is written.
    pub fn includes_database(self) -> bool {
        matches!(self, StorageMode::Database | StorageMode::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::Json => "json",
            StorageMode::Database => "database",
            StorageMode::Both => "both",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageMode::Json),
            "database" | "db" => Ok(StorageMode::Database),
            "both" => Ok(StorageMode::Both),
            other => Err(Error::Config(format!(
                "unknown storage mode '{}' (expected json, database or both)",
                other
            ))),
        }
    }
}
