//! Relational store: documents and their pages in two tables.
//!
//! Backed by diesel on SQLite (always) or PostgreSQL (`postgres` feature).
//! Every operation opens its own connection, and writes run inside a single
//! transaction so a failed save or delete leaves nothing behind.

mod connection;
pub mod models;
pub mod schema;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub use connection::DatabaseUrl;
use connection::with_conn;
use models::{DocumentRow, NewDocumentRow, NewPageRow, PageRow};
use schema::{documents, pages};

use super::DocumentSink;
use crate::error::{Error, Result};
use crate::model::{Document, DocumentSummary, StoredDocument};

/// Rows per multi-row page insert; keeps well under SQLite's bind limit.
const PAGE_INSERT_CHUNK: usize = 500;

/// Document store on a relational database.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    url: DatabaseUrl,
}

impl DatabaseStore {
    /// Open the database at `url` and make sure the schema exists.
    pub fn open(url: &str) -> Result<Self> {
        let url = DatabaseUrl::parse(url)?;
        if let DatabaseUrl::Sqlite(path) = &url {
            ensure_parent_dir(Path::new(path))?;
        }

        let store = Self { url };
        store.create_tables()?;
        log::info!("Opened {} database {}", store.url.backend(), store.url);
        Ok(store)
    }

    pub fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Create the tables if they do not exist yet.
    pub fn create_tables(&self) -> Result<()> {
        let ddl = self.url.schema();
        with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for statement in ddl {
                diesel::sql_query(*statement).execute(conn)?;
            }
            Ok(())
        }))
        .map_err(|e| Error::persistence("create tables", e))
    }

    /// Drop both tables and everything in them.
    pub fn drop_tables(&self) -> Result<()> {
        with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for statement in schema::DROP_SCHEMA {
                diesel::sql_query(*statement).execute(conn)?;
            }
            Ok(())
        }))
        .map_err(|e| Error::persistence("drop tables", e))
    }

    /// Save a document stamped with the current time.
    pub fn save(&self, doc: &Document) -> Result<i32> {
        self.save_at(doc, Utc::now())
    }

    /// Save a document and all its pages; returns the new document id.
    pub fn save_at(&self, doc: &Document, processed_at: DateTime<Utc>) -> Result<i32> {
        let new_doc = NewDocumentRow::new(doc, processed_at);

        let id = with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let id: i32 = diesel::insert_into(documents::table)
                .values(&new_doc)
                .returning(documents::id)
                .get_result(conn)?;

            let rows = NewPageRow::for_document(id, doc);
            for chunk in rows.chunks(PAGE_INSERT_CHUNK) {
                diesel::insert_into(pages::table).values(chunk).execute(conn)?;
            }
            Ok(id)
        }))
        .map_err(|e| Error::persistence("save document", e))?;

        log::info!("Saved {} as document {}", doc.filename, id);
        Ok(id)
    }

    /// Fetch a document with its pages in page order.
    pub fn get(&self, id: i32) -> Result<Option<StoredDocument>> {
        with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let Some(row) = documents::table
                .find(id)
                .select(DocumentRow::as_select())
                .first(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let pages = PageRow::belonging_to(&row)
                .select(PageRow::as_select())
                .order(pages::page_number.asc())
                .load(conn)?;
            Ok(Some(row.into_stored(pages)))
        }))
        .map_err(|e| Error::persistence("load document", e))
    }

    /// Summaries of every stored document, oldest first. No page text.
    pub fn list(&self) -> Result<Vec<DocumentSummary>> {
        let rows = with_conn!(self.url, conn => documents::table
            .order(documents::id.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn))
        .map_err(|e| Error::persistence("list documents", e))?;

        Ok(rows.into_iter().map(DocumentRow::into_summary).collect())
    }

    /// Documents whose file name contains `needle`, with their pages.
    ///
    /// The needle is matched literally; an empty needle matches nothing.
    /// Case sensitivity follows the backend's LIKE.
    pub fn search(&self, needle: &str) -> Result<Vec<StoredDocument>> {
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", escape_like(needle));

        with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let rows = documents::table
                .filter(documents::filename.like(pattern.as_str()).escape('\\'))
                .order(documents::id.asc())
                .select(DocumentRow::as_select())
                .load(conn)?;

            let pages = PageRow::belonging_to(&rows)
                .select(PageRow::as_select())
                .order(pages::page_number.asc())
                .load(conn)?;

            Ok(pages
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(pages, row)| row.into_stored(pages))
                .collect())
        }))
        .map_err(|e| Error::persistence("search documents", e))
    }

    /// Delete a document and its pages; `false` if the id does not exist.
    pub fn delete(&self, id: i32) -> Result<bool> {
        let removed = with_conn!(self.url, conn => conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(pages::table.filter(pages::document_id.eq(id))).execute(conn)?;
            let rows = diesel::delete(documents::table.find(id)).execute(conn)?;
            Ok(rows > 0)
        }))
        .map_err(|e| Error::persistence("delete document", e))?;

        if removed {
            log::info!("Deleted document {}", id);
        }
        Ok(removed)
    }

    /// Number of page rows owned by document `id`.
    pub fn count_pages(&self, id: i32) -> Result<i64> {
        with_conn!(self.url, conn => pages::table
            .filter(pages::document_id.eq(id))
            .count()
            .get_result(&mut conn))
        .map_err(|e| Error::persistence("count pages", e))
    }
}

impl DocumentSink for DatabaseStore {
    fn name(&self) -> &str {
        "database"
    }

    fn save_at(&self, doc: &Document, processed_at: DateTime<Utc>) -> Result<String> {
        DatabaseStore::save_at(self, doc, processed_at).map(|id| format!("document {}", id))
    }
}

/// Escape LIKE wildcards so `needle` matches literally under `ESCAPE '\'`.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
