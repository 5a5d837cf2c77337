//! Benchmarks for pdfvault extraction and storage.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic PDFs generated with lopdf.

use std::path::{Path, PathBuf};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object};
use tempfile::TempDir;

/// Creates a synthetic PDF with the given number of pages.
fn create_test_pdf(dir: &Path, page_count: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for i in 0..page_count {
        let text = format!(
            "Page {} - Benchmark test content for pdfvault extraction throughput.",
            i + 1
        );
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(lopdf::Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(format!("bench_{}.pdf", page_count));
    doc.save(&path).unwrap();
    path
}

/// Benchmark header sniffing.
fn bench_version_sniffing(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let pdf = create_test_pdf(tmp.path(), 1);

    c.bench_function("sniff_pdf_version", |b| {
        b.iter(|| pdfvault::sniff_pdf_version(black_box(&pdf)).unwrap());
    });
}

/// Benchmark extraction at various sizes.
fn bench_extraction(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let mut group = c.benchmark_group("extraction");

    for page_count in [1, 10, 50].iter() {
        let pdf = create_test_pdf(tmp.path(), *page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pdfvault::extract_file(black_box(&pdf)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark saving a 50 page document to SQLite.
fn bench_database_save(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let pdf = create_test_pdf(tmp.path(), 50);
    let doc = pdfvault::extract_file(&pdf).unwrap();
    let url = format!("sqlite://{}", tmp.path().join("bench.db").display());
    let store = pdfvault::DatabaseStore::open(&url).unwrap();

    c.bench_function("database_save_50_pages", |b| {
        b.iter(|| store.save(black_box(&doc)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_version_sniffing,
    bench_extraction,
    bench_database_save,
);
criterion_main!(benches);
