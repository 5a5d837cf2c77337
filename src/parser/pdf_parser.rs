//! PDF text and metadata extraction using lopdf.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use flate2::read::ZlibDecoder;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::detect::sniff_pdf_version;
use crate::error::{Error, Result};
use crate::model::{Document, Page};

use super::options::{ErrorMode, ExtractOptions};
use super::warning::{Extracted, ExtractionWarning};

/// Reads one PDF file into a [`Document`].
///
/// The file is fully parsed when opened, so a corrupt or unsupported file
/// fails in [`PdfExtractor::open`] rather than halfway through the pages.
pub struct PdfExtractor {
    doc: LopdfDocument,
    path: PathBuf,
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let doc = load_document(path).map_err(|e| Error::extraction(path, e))?;
        let path = absolute(path);

        Ok(Self { doc, path, options })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Extract metadata and every page's text.
    ///
    /// Metadata and page failures are degraded and reported as warnings;
    /// in strict mode a page failure fails the document instead.
    pub fn extract(&self) -> Result<Extracted<Document>> {
        let mut document = Document::for_path(&self.path);
        let mut warnings = Vec::new();

        self.extract_metadata(&mut document, &mut warnings);

        for (index, (page_num, page_id)) in self.doc.get_pages().into_iter().enumerate() {
            let page_number = index as u32 + 1;

            let content = match self.extract_page_text(page_num, page_id) {
                Ok(text) => text,
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::extraction(&self.path, e));
                    }
                    log::warn!(
                        "{}: failed to extract text from page {}: {}",
                        document.filename,
                        page_number,
                        e
                    );
                    warnings.push(ExtractionWarning::page(page_number, e.to_string()));
                    String::new()
                }
            };

            document.add_page(Page::new(page_number, content));
        }

        Ok(Extracted {
            value: document,
            warnings,
        })
    }

    /// Fill title, author and creation date; each field fails on its own.
    fn extract_metadata(&self, document: &mut Document, warnings: &mut Vec<ExtractionWarning>) {
        let info = match self.info_dictionary() {
            Ok(Some(info)) => info,
            Ok(None) => return,
            Err(reason) => {
                log::warn!("{}: unreadable info dictionary: {}", document.filename, reason);
                warnings.push(ExtractionWarning::metadata("info", reason));
                return;
            }
        };

        let mut field = |name: &str, key: &str| match get_string_from_dict(info, key.as_bytes()) {
            Ok(value) => value,
            Err(reason) => {
                log::warn!("{}: skipping {}: {}", document.filename, name, reason);
                warnings.push(ExtractionWarning::metadata(name, reason));
                None
            }
        };

        let title = field("title", "Title");
        let author = field("author", "Author");
        let created = field("created_at", "CreationDate");

        document.title = title;
        document.author = author;
        document.created_at = created.and_then(|raw| match parse_pdf_date(&raw) {
            Some(date) => Some(date),
            None => {
                log::warn!("{}: unparseable creation date '{}'", document.filename, raw);
                warnings.push(ExtractionWarning::metadata(
                    "created_at",
                    format!("unparseable date '{}'", raw),
                ));
                None
            }
        });
    }

    /// Resolve the trailer's Info entry, if the file has one.
    fn info_dictionary(&self) -> std::result::Result<Option<&Dictionary>, String> {
        let info = match self.doc.trailer.get(b"Info") {
            Ok(info) => info,
            Err(_) => return Ok(None),
        };

        match info {
            Object::Reference(id) => self
                .doc
                .get_dictionary(*id)
                .map(Some)
                .map_err(|e| e.to_string()),
            Object::Dictionary(dict) => Ok(Some(dict)),
            _ => Err("Info entry is not a dictionary".to_string()),
        }
    }

    /// Extract text from a page.
    fn extract_page_text(&self, page_num: u32, page_id: ObjectId) -> Result<String> {
        self.check_page_contents(page_num, page_id)?;

        let text = self
            .doc
            .extract_text(&[page_num])
            .map_err(|e| Error::PdfParse(format!("page {}: {}", page_num, e)))?;

        if self.options.trim_text {
            Ok(text.trim().to_string())
        } else {
            Ok(text)
        }
    }

    /// Fail on content streams that lopdf would silently read as empty.
    ///
    /// Every `Contents` entry must resolve to a stream, and a filtered
    /// stream must decode.
    fn check_page_contents(&self, page_num: u32, page_id: ObjectId) -> Result<()> {
        for id in self.doc.get_page_contents(page_id) {
            let stream = self
                .doc
                .get_object(id)
                .and_then(Object::as_stream)
                .map_err(|e| {
                    Error::PdfParse(format!(
                        "page {}: content {} {} R: {}",
                        page_num, id.0, id.1, e
                    ))
                })?;

            check_stream_decodes(stream).map_err(|reason| {
                Error::PdfParse(format!(
                    "page {}: undecodable content {} {} R: {}",
                    page_num, id.0, id.1, reason
                ))
            })?;
        }
        Ok(())
    }
}

/// Decode a filtered stream, failing where lopdf would only log.
fn check_stream_decodes(stream: &Stream) -> std::result::Result<(), String> {
    if !stream.dict.has(b"Filter") {
        return Ok(());
    }
    let filters = stream.filters().map_err(|e| e.to_string())?;

    // lopdf only logs zlib errors
    if filters.first().map(String::as_str) == Some("FlateDecode") && !stream.content.is_empty() {
        let mut inflated = Vec::new();
        ZlibDecoder::new(stream.content.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|e| format!("FlateDecode: {}", e))?;
    }

    stream.decompressed_content().map(|_| ()).map_err(|e| e.to_string())
}

/// Make `path` absolute without resolving symlinks.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Sniff the header, then parse the whole file.
fn load_document(path: &Path) -> Result<LopdfDocument> {
    let version = sniff_pdf_version(path)?;
    log::debug!("Loading {} (PDF {})", path.display(), version);
    Ok(LopdfDocument::load(path)?)
}

/// Read a text entry from a PDF dictionary.
///
/// Missing and blank entries are `Ok(None)`; entries that exist but cannot
/// be decoded are errors.
fn get_string_from_dict(
    dict: &Dictionary,
    key: &[u8],
) -> std::result::Result<Option<String>, String> {
    let obj = match dict.get(key) {
        Ok(obj) => obj,
        Err(_) => return Ok(None),
    };

    let text = match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes)?,
        Object::Name(bytes) => String::from_utf8(bytes.clone()).map_err(|e| e.to_string())?,
        other => return Err(format!("expected a string, found {}", object_kind(other))),
    };

    let text = text.trim_matches(char::from(0)).trim().to_string();
    Ok((!text.is_empty()).then_some(text))
}

/// Short name of a PDF object's type, for warning messages.
fn object_kind(obj: &Object) -> &'static str {
    match obj {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) | Object::Real(_) => "number",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}

/// Decode a PDF text string: UTF-16 with BOM (either byte order), else
/// UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> std::result::Result<String, String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => return decode_utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => return decode_utf16(rest, u16::from_le_bytes),
        _ => {}
    }

    Ok(String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect()))
}

fn decode_utf16(
    bytes: &[u8],
    unit: fn([u8; 2]) -> u16,
) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("truncated UTF-16 string".to_string());
    }
    let units: Vec<u16> = bytes.chunks(2).map(|c| unit([c[0], c[1]])).collect();
    String::from_utf16(&units).map_err(|e| e.to_string())
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
///
/// Missing trailing components default to their minimum; a missing or `Z`
/// offset is UTC.
fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count().min(14);
    if digits < 4 {
        return None;
    }
    let (stamp, offset) = s.split_at(digits);

    let component = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        stamp.get(range).map_or(Some(default), |part| part.parse().ok())
    };

    let year: i32 = stamp.get(0..4)?.parse().ok()?;
    let month = component(4..6, 1)?;
    let day = component(6..8, 1)?;
    let hour = component(8..10, 0)?;
    let minute = component(10..12, 0)?;
    let second = component(12..14, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_pdf_offset(offset)?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the timezone suffix of a PDF date: "", "Z", "+05'30'", "-08'00".
fn parse_pdf_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim_end_matches('\'');
    let sign = match s.chars().next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let mut parts = s[1..].split('\'');
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = match parts.next() {
        Some(m) if !m.is_empty() => m.parse().ok()?,
        _ => 0,
    };

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
