//! Integration tests for the JSON file store.

mod common;

use chrono::{TimeZone, Utc};
use pdfvault::{extract_file, JsonFormat, JsonStore};
use tempfile::TempDir;

use common::{write_pdf_with_info, Info};

#[test]
fn test_extract_save_load_round_trip() {
    let tmp = TempDir::new().unwrap();
    let pdf = write_pdf_with_info(
        &tmp.path().join("informe_enero.pdf"),
        &["January summary", "Details", "Appendix"],
        Some(Info {
            title: Some("Informe"),
            creation_date: Some("D:20240110"),
            ..Default::default()
        }),
    );
    let doc = extract_file(&pdf).unwrap();

    let store = JsonStore::new(tmp.path().join("output_json")).unwrap();
    let saved = store.save(&doc).unwrap();
    let file_name = saved.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("informe_enero_"));
    assert!(file_name.ends_with(".json"));

    let loaded = store.load(&saved).unwrap();
    assert_eq!(loaded.filename, doc.filename);
    assert_eq!(loaded.page_count, doc.page_count);
    assert_eq!(loaded.pages, doc.pages);
    assert_eq!(loaded.title.as_deref(), Some("Informe"));
    assert_eq!(loaded.created_at.as_deref(), Some("2024-01-10T00:00:00Z"));
    assert!(loaded.processed_at.is_some());
}

#[test]
fn test_list_returns_every_save() {
    let tmp = TempDir::new().unwrap();
    let pdf = write_pdf_with_info(&tmp.path().join("a.pdf"), &["x"], None);
    let doc = extract_file(&pdf).unwrap();

    let store = JsonStore::new(tmp.path().join("out"))
        .unwrap()
        .with_format(JsonFormat::Compact);
    let first = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap();
    store.save_at(&doc, first).unwrap();
    store.save_at(&doc, second).unwrap();
    // Same second overwrites
    store.save_at(&doc, second).unwrap();

    let files = store.list().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("a_20240301_120000.json"));
    assert!(files[1].ends_with("a_20240301_120001.json"));
}

#[test]
fn test_load_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let store = JsonStore::new(tmp.path()).unwrap();
    assert!(store.load(tmp.path().join("missing.json")).is_err());
}
