//! PDF header detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the PDF version from a file header.
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    pdf_version(&header)
}

/// Read the PDF version from the first bytes of a file.
///
/// Fails with [`Error::UnknownFormat`] when the magic is missing or the
/// version is not of the form `d.d`.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    let Some(rest) = data.strip_prefix(PDF_MAGIC) else {
        return Err(Error::UnknownFormat);
    };
    let version = rest.get(..VERSION_LEN).ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).to_string())
        }
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_ok()
}

/// Check if a file starts with a PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    pdf_version_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(pdf_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_detect_invalid_format() {
        assert!(matches!(pdf_version(b"<!DOCTYPE html>"), Err(Error::UnknownFormat)));
        assert!(matches!(pdf_version(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(pdf_version(b"%PDF-x.y"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }

    #[test]
    fn test_is_pdf_path() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        let txt = dir.path().join("b.pdf");
        std::fs::write(&pdf, b"%PDF-1.5\n...").unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        assert!(is_pdf(&pdf));
        assert!(!is_pdf(&txt));
        assert!(!is_pdf(dir.path().join("missing.pdf")));
    }
}
