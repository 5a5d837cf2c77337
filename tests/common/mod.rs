//! Shared helpers for integration tests: PDFs generated with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Entries for the document information dictionary.
#[derive(Default)]
pub struct Info<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub creation_date: Option<&'a str>,
}

/// How a generated page's content is laid out.
pub enum PageSpec<'a> {
    /// One readable line of text.
    Text(&'a str),
    /// An unfiltered content stream with these exact bytes.
    Raw(&'a [u8]),
    /// A stream claiming FlateDecode whose bytes are not zlib data.
    GarbageFlate,
    /// A `Contents` reference to an object that does not exist.
    MissingContents,
}

/// Write a PDF with one line of ASCII text per page.
pub fn write_pdf(path: &Path, pages: &[&str]) -> PathBuf {
    write_pdf_with_info(path, pages, None)
}

/// Write a PDF with text pages and an optional info dictionary.
pub fn write_pdf_with_info(path: &Path, pages: &[&str], info: Option<Info<'_>>) -> PathBuf {
    let mut doc = build_pdf(pages);

    if let Some(info) = info {
        let mut dict = lopdf::Dictionary::new();
        if let Some(title) = info.title {
            dict.set("Title", Object::string_literal(title));
        }
        if let Some(author) = info.author {
            dict.set("Author", Object::string_literal(author));
        }
        if let Some(date) = info.creation_date {
            dict.set("CreationDate", Object::string_literal(date));
        }
        let info_id = doc.add_object(dict);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path).unwrap();
    path.to_path_buf()
}

/// Write a PDF whose pages follow `pages`.
pub fn write_pdf_pages(path: &Path, pages: &[PageSpec<'_>]) -> PathBuf {
    let mut doc = build_pdf_pages(pages);
    doc.save(path).unwrap();
    path.to_path_buf()
}

/// Write a PDF whose info dictionary holds `entries` verbatim.
pub fn write_pdf_with_raw_info(path: &Path, pages: &[&str], entries: Vec<(&str, Object)>) -> PathBuf {
    let mut doc = build_pdf(pages);

    let mut dict = lopdf::Dictionary::new();
    for (key, value) in entries {
        dict.set(key, value);
    }
    let info_id = doc.add_object(dict);
    doc.trailer.set("Info", info_id);

    doc.save(path).unwrap();
    path.to_path_buf()
}

fn build_pdf(pages: &[&str]) -> Document {
    let specs: Vec<PageSpec<'_>> = pages.iter().map(|text| PageSpec::Text(text)).collect();
    build_pdf_pages(&specs)
}

fn build_pdf_pages(pages: &[PageSpec<'_>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|layout| add_page(&mut doc, pages_id, resources_id, layout).into())
        .collect();

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    layout: &PageSpec<'_>,
) -> ObjectId {
    let contents_id = match layout {
        PageSpec::Text(text) => {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 760.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
        }
        PageSpec::Raw(bytes) => doc.add_object(Stream::new(dictionary! {}, bytes.to_vec())),
        PageSpec::GarbageFlate => doc.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            b"this is not zlib data at all".to_vec(),
        )),
        PageSpec::MissingContents => (9999, 0),
    };

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => contents_id,
        "Resources" => resources_id,
    })
}
