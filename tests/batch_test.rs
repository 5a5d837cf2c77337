//! End-to-end tests for batch processing.

mod common;

use std::fs;

use pdfvault::{
    BatchEvent, BatchProcessor, Config, DatabaseConfig, DatabaseStore, JsonStore, StorageMode,
};
use tempfile::TempDir;

use common::write_pdf;

fn config(tmp: &TempDir) -> Config {
    Config {
        database: DatabaseConfig::Sqlite {
            path: tmp.path().join("pdf_database.db"),
        },
        input_dir: tmp.path().join("pdfs"),
        json_output_dir: tmp.path().join("output_json"),
    }
}

fn seed_inputs(config: &Config) {
    fs::create_dir_all(&config.input_dir).unwrap();
    write_pdf(
        &config.input_dir.join("informe_enero.pdf"),
        &["Enero one", "Enero two"],
    );
    write_pdf(&config.input_dir.join("reporte_febrero.PDF"), &["Febrero"]);
    fs::write(config.input_dir.join("broken.pdf"), b"").unwrap();
    fs::write(config.input_dir.join("readme.txt"), "ignored").unwrap();
}

#[test]
fn test_both_mode_saves_everywhere() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    seed_inputs(&config);

    let processor = BatchProcessor::new(StorageMode::Both, &config).unwrap();
    let report = processor.run(&config.input_dir).unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken.pdf"));

    let json = JsonStore::new(&config.json_output_dir).unwrap();
    assert_eq!(json.list().unwrap().len(), 2);

    let db = DatabaseStore::open(&config.database_url()).unwrap();
    let summaries = db.list().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].filename, "informe_enero.pdf");
    assert_eq!(summaries[0].page_count, 2);
}

#[test]
fn test_both_mode_shares_processed_at() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    fs::create_dir_all(&config.input_dir).unwrap();
    write_pdf(&config.input_dir.join("a.pdf"), &["only"]);

    let processor = BatchProcessor::new(StorageMode::Both, &config).unwrap();
    processor.run(&config.input_dir).unwrap();

    let json = JsonStore::new(&config.json_output_dir).unwrap();
    let files = json.list().unwrap();
    let from_json = json.load(&files[0]).unwrap().processed_at.unwrap();

    let db = DatabaseStore::open(&config.database_url()).unwrap();
    let from_db = db.list().unwrap()[0].processed_at;

    let from_json = chrono::DateTime::parse_from_rfc3339(&from_json).unwrap();
    assert_eq!(from_json, from_db);
}

#[test]
fn test_json_mode_leaves_database_alone() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    seed_inputs(&config);

    let processor = BatchProcessor::new(StorageMode::Json, &config).unwrap();
    let report = processor.run(&config.input_dir).unwrap();
    assert_eq!(report.processed, 2);
    assert!(!tmp.path().join("pdf_database.db").exists());
}

#[test]
fn test_events_follow_each_file() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    seed_inputs(&config);

    let processor = BatchProcessor::new(StorageMode::Database, &config).unwrap();
    let mut events = Vec::new();
    processor
        .run_with(&config.input_dir, |event| events.push(event.clone()))
        .unwrap();

    let started = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::FileStarted { .. }))
        .count();
    let saved: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Saved { sink, .. } => Some(sink.as_str()),
            _ => None,
        })
        .collect();
    let failed = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::FileFailed { .. }))
        .count();

    assert!(matches!(events[0], BatchEvent::Started { total: 3 }));
    assert_eq!(started, 3);
    assert_eq!(saved, vec!["database", "database"]);
    assert_eq!(failed, 1);
    match events.last() {
        Some(BatchEvent::Finished(report)) => assert_eq!(report.processed, 2),
        other => panic!("unexpected last event: {other:?}"),
    }
}

#[test]
fn test_zero_files_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);
    config.ensure_directories().unwrap();

    let processor = BatchProcessor::new(StorageMode::Json, &config).unwrap();
    let report = processor.run(&config.input_dir).unwrap();
    assert_eq!(report.discovered, 0);
    assert_eq!(report.processed, 0);
    assert!(report.failures.is_empty());
}
