//! Source file sniffing: PDF header validation and directory discovery.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const HEADER_LEN: u64 = 16;

/// File extension for PDF sources, compared case-insensitively.
pub const PDF_EXTENSION: &str = "pdf";

/// Read the first bytes of `path` and return the PDF header version.
///
/// Zero-byte and truncated files yield `Error::UnknownFormat` rather
/// than an end-of-file I/O error.
pub fn sniff_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    file.take(HEADER_LEN).read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Extract the PDF version from the leading bytes of a file.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

/// Check if a version string looks like "1.7" or "2.0".
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if a path carries the `.pdf` extension (any case).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

/// List the PDF files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into.
pub fn discover_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    log::debug!("Discovered {} PDF files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(pdf_version_from_bytes(data).unwrap(), "1.7");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = pdf_version_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            pdf_version_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_bad_version() {
        let result = pdf_version_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "x.y"));
    }

    #[test]
    fn test_sniff_zero_byte_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        fs::write(&path, b"").unwrap();
        assert!(matches!(sniff_pdf_version(&path), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension("report.pdf"));
        assert!(has_pdf_extension("REPORT.PDF"));
        assert!(!has_pdf_extension("report.pdf.txt"));
        assert!(!has_pdf_extension("report"));
    }

    #[test]
    fn test_discover_pdfs_is_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("a.PDF"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();
        fs::write(dir.path().join("nested.pdf").join("c.pdf"), b"%PDF-1.4").unwrap();

        let files = discover_pdfs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_pdfs("/definitely/not/here");
        assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
    }
}
