//! Backend selection and per-operation connections.
//!
//! The backend is chosen from the database URL at runtime. No connection is
//! pooled: each store operation establishes one and drops it when done.

use std::fmt;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

#[cfg(feature = "postgres")]
use diesel::pg::PgConnection;

use super::schema;
use crate::error::{Error, Result};

/// A parsed database URL.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Path to an SQLite database file
    Sqlite(String),
    /// libpq connection URL
    #[cfg(feature = "postgres")]
    Postgres(String),
}

/// An open connection to either backend.
pub(crate) enum DbConnection {
    Sqlite(SqliteConnection),
    #[cfg(feature = "postgres")]
    Postgres(PgConnection),
}

impl DatabaseUrl {
    /// Parse a database URL.
    ///
    /// `postgres://` and `postgresql://` select PostgreSQL; anything else is
    /// an SQLite path with an optional `sqlite://` or `sqlite:` prefix.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return postgres_url(url);
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path.is_empty() {
            return Err(Error::Config("empty SQLite database path".to_string()));
        }
        Ok(DatabaseUrl::Sqlite(path.to_string()))
    }

    /// Name of the selected backend.
    pub fn backend(&self) -> &'static str {
        match self {
            DatabaseUrl::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            DatabaseUrl::Postgres(_) => "postgresql",
        }
    }

    pub fn is_sqlite(&self) -> bool {
        matches!(self, DatabaseUrl::Sqlite(_))
    }

    /// DDL creating the schema on this backend.
    pub(crate) fn schema(&self) -> &'static [&'static str] {
        match self {
            DatabaseUrl::Sqlite(_) => schema::SQLITE_SCHEMA,
            #[cfg(feature = "postgres")]
            DatabaseUrl::Postgres(_) => schema::POSTGRES_SCHEMA,
        }
    }

    /// Establish a new connection.
    pub(crate) fn connect(&self) -> Result<DbConnection> {
        match self {
            DatabaseUrl::Sqlite(path) => {
                let mut conn = SqliteConnection::establish(path)
                    .map_err(|e| Error::persistence("connect", e))?;
                // Cascades are off per connection unless asked for
                diesel::sql_query("PRAGMA foreign_keys = ON")
                    .execute(&mut conn)
                    .map_err(|e| Error::persistence("enable foreign keys", e))?;
                Ok(DbConnection::Sqlite(conn))
            }
            #[cfg(feature = "postgres")]
            DatabaseUrl::Postgres(url) => PgConnection::establish(url)
                .map(DbConnection::Postgres)
                .map_err(|e| Error::persistence("connect", e)),
        }
    }
}

#[cfg(feature = "postgres")]
fn postgres_url(url: &str) -> Result<DatabaseUrl> {
    Ok(DatabaseUrl::Postgres(url.to_string()))
}

#[cfg(not(feature = "postgres"))]
fn postgres_url(_url: &str) -> Result<DatabaseUrl> {
    Err(Error::Config(
        "PostgreSQL support not compiled in; rebuild with --features postgres".to_string(),
    ))
}

/// Hide the password of a PostgreSQL URL.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseUrl::Sqlite(path) => write!(f, "sqlite://{}", path),
            #[cfg(feature = "postgres")]
            DatabaseUrl::Postgres(url) => f.write_str(&redact(url)),
        }
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DatabaseUrl").field(&self.to_string()).finish()
    }
}

/// Run `$body` with `$conn` bound to a fresh connection on whichever backend
/// `$url` selects. The connection is dropped when the body finishes.
macro_rules! with_conn {
    ($url:expr, $conn:ident => $body:expr) => {{
        match $url.connect()? {
            $crate::storage::database::connection::DbConnection::Sqlite(mut $conn) => $body,
            #[cfg(feature = "postgres")]
            $crate::storage::database::connection::DbConnection::Postgres(mut $conn) => $body,
        }
    }};
}

pub(crate) use with_conn;
