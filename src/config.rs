//! Runtime configuration from environment variables.
//!
//! Built once at startup and passed to whatever needs it. A `.env` file in
//! the working directory is loaded first; real environment variables win.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

const DEFAULT_DATABASE_PATH: &str = "./pdf_database.db";
const DEFAULT_POSTGRES_USER: &str = "postgres";
const DEFAULT_POSTGRES_HOST: &str = "localhost";
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_POSTGRES_DB: &str = "pdf_extractor";
const DEFAULT_INPUT_DIR: &str = "./pdfs";
const DEFAULT_OUTPUT_DIR: &str = "./output_json";

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Sqlite {
        path: PathBuf,
    },
    Postgres {
        user: String,
        password: String,
        host: String,
        port: u16,
        database: String,
    },
}

impl DatabaseConfig {
    /// Render as a URL accepted by [`crate::DatabaseStore::open`].
    pub fn url(&self) -> String {
        match self {
            DatabaseConfig::Sqlite { path } => format!("sqlite://{}", path.display()),
            DatabaseConfig::Postgres {
                user,
                password,
                host,
                port,
                database,
            } => format!(
                "postgresql://{}:{}@{}:{}/{}",
                user, password, host, port, database
            ),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Default directory scanned for PDFs
    pub input_dir: PathBuf,
    /// Directory the JSON store writes into
    pub json_output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::Sqlite {
                path: PathBuf::from(DEFAULT_DATABASE_PATH),
            },
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            json_output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database = match get("DATABASE_TYPE")
            .map(|t| t.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("sqlite") => DatabaseConfig::Sqlite {
                path: PathBuf::from(get_or("DATABASE_PATH", DEFAULT_DATABASE_PATH)),
            },
            Some("postgresql") | Some("postgres") => DatabaseConfig::Postgres {
                user: get_or("POSTGRES_USER", DEFAULT_POSTGRES_USER),
                password: get("POSTGRES_PASSWORD").unwrap_or_default(),
                host: get_or("POSTGRES_HOST", DEFAULT_POSTGRES_HOST),
                port: match get("POSTGRES_PORT") {
                    Some(port) => port.trim().parse().map_err(|_| {
                        Error::Config(format!("POSTGRES_PORT is not a port number: '{}'", port))
                    })?,
                    None => DEFAULT_POSTGRES_PORT,
                },
                database: get_or("POSTGRES_DB", DEFAULT_POSTGRES_DB),
            },
            Some(other) => {
                return Err(Error::Config(format!(
                    "unknown DATABASE_TYPE '{}' (expected sqlite or postgresql)",
                    other
                )))
            }
        };

        Ok(Self {
            database,
            input_dir: PathBuf::from(get_or("PDF_INPUT_DIR", DEFAULT_INPUT_DIR)),
            json_output_dir: PathBuf::from(get_or("JSON_OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
        })
    }

    pub fn database_url(&self) -> String {
        self.database.url()
    }

    /// Create the input and JSON output directories if missing.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.input_dir, &self.json_output_dir] {
            if !dir.is_dir() {
                fs::create_dir_all(dir)?;
                log::debug!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }
}
