//! Error types for pagesift.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pagesift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building outlines or rankings.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Invalid task descriptor or option value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input directory holds nothing the pipeline can process.
    #[error("No PDF documents found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// An embedding model failed to produce a vector.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
