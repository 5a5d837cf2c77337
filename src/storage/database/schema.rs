//! Table definitions and DDL for the relational store.

diesel::table! {
    documents (id) {
        id -> Integer,
        filename -> Text,
        source_path -> Text,
        page_count -> Integer,
        title -> Nullable<Text>,
        author -> Nullable<Text>,
        created_at -> Nullable<Text>,
        processed_at -> Text,
    }
}

diesel::table! {
    pages (id) {
        id -> Integer,
        document_id -> Integer,
        page_number -> Integer,
        content -> Text,
    }
}

diesel::joinable!(pages -> documents (document_id));
diesel::allow_tables_to_appear_in_same_query!(documents, pages);

pub(crate) const SQLITE_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS documents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT NOT NULL,
        source_path TEXT NOT NULL,
        page_count INTEGER NOT NULL,
        title TEXT,
        author TEXT,
        created_at TEXT,
        processed_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
        page_number INTEGER NOT NULL,
        content TEXT NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_pages_document ON pages(document_id, page_number)",
];

#[cfg(feature = "postgres")]
pub(crate) const POSTGRES_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS documents (
        id SERIAL PRIMARY KEY,
        filename TEXT NOT NULL,
        source_path TEXT NOT NULL,
        page_count INTEGER NOT NULL,
        title TEXT,
        author TEXT,
        created_at TEXT,
        processed_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pages (
        id SERIAL PRIMARY KEY,
        document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
        page_number INTEGER NOT NULL,
        content TEXT NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_pages_document ON pages(document_id, page_number)",
];

/// Children first, so the foreign key never blocks a drop.
pub(crate) const DROP_SCHEMA: &[&str] = &[
    "DROP TABLE IF EXISTS pages",
    "DROP TABLE IF EXISTS documents",
];
