//! Row types for the documents and pages tables.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::schema::{documents, pages};
use crate::model::{Document, DocumentSummary, Page, StoredDocument};

/// Document record from the database.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
pub struct DocumentRow {
    pub id: i32,
    pub filename: String,
    pub source_path: String,
    pub page_count: i32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub processed_at: String,
}

/// Page record from the database.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = pages)]
#[diesel(belongs_to(DocumentRow, foreign_key = document_id))]
pub struct PageRow {
    pub id: i32,
    pub document_id: i32,
    pub page_number: i32,
    pub content: String,
}

/// New document for insertion.
#[derive(Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow<'a> {
    pub filename: &'a str,
    pub source_path: &'a str,
    pub page_count: i32,
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub created_at: Option<String>,
    pub processed_at: String,
}

/// New page for insertion.
#[derive(Insertable)]
#[diesel(table_name = pages)]
pub struct NewPageRow<'a> {
    pub document_id: i32,
    pub page_number: i32,
    pub content: &'a str,
}

impl<'a> NewDocumentRow<'a> {
    pub fn new(doc: &'a Document, processed_at: DateTime<Utc>) -> Self {
        Self {
            filename: &doc.filename,
            source_path: &doc.source_path,
            page_count: doc.page_count as i32,
            title: doc.title.as_deref(),
            author: doc.author.as_deref(),
            created_at: doc.created_at.map(format_timestamp),
            processed_at: format_timestamp(processed_at),
        }
    }
}

impl<'a> NewPageRow<'a> {
    /// Page rows for every page of `doc`, owned by `document_id`.
    pub fn for_document(document_id: i32, doc: &'a Document) -> Vec<Self> {
        doc.pages
            .iter()
            .map(|page| Self {
                document_id,
                page_number: page.page_number as i32,
                content: &page.content,
            })
            .collect()
    }
}

impl DocumentRow {
    /// Rebuild the document with `pages` already in page order.
    pub fn into_stored(self, pages: Vec<PageRow>) -> StoredDocument {
        let processed_at = parse_timestamp(&self.processed_at);
        StoredDocument {
            id: self.id,
            document: Document {
                filename: self.filename,
                source_path: self.source_path,
                page_count: self.page_count.max(0) as u32,
                title: self.title,
                author: self.author,
                created_at: self.created_at.as_deref().and_then(parse_timestamp),
                processed_at,
                pages: pages
                    .into_iter()
                    .map(|row| Page::new(row.page_number.max(0) as u32, row.content))
                    .collect(),
            },
        }
    }

    pub fn into_summary(self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            processed_at: parse_timestamp(&self.processed_at).unwrap_or_default(),
            filename: self.filename,
            page_count: self.page_count.max(0) as u32,
            title: self.title,
            author: self.author,
        }
    }
}

/// Timestamps are stored as RFC 3339 text in UTC.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
