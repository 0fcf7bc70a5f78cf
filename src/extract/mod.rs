//! Layout extraction: PDF pages to positioned words and page text.

mod detect;
mod layout;
mod options;
mod page_text;
mod pdf;

pub use detect::{is_pdf, is_pdf_bytes, pdf_version, pdf_version_from_path};
pub use options::{ErrorMode, ExtractOptions};
pub use page_text::{render_page_text, visual_lines};
pub use pdf::LopdfExtractor;

use std::path::Path;

use crate::error::Result;
use crate::model::PageContent;

/// Turns a document on disk into per-page words and text.
///
/// Pages come back in document order, numbered from 1.
pub trait LayoutExtractor: Send + Sync {
    /// Extract every page of the document at `path`.
    fn extract(&self, path: &Path) -> Result<Vec<PageContent>>;
}

impl<T: LayoutExtractor + ?Sized> LayoutExtractor for &T {
    fn extract(&self, path: &Path) -> Result<Vec<PageContent>> {
        (**self).extract(path)
    }
}

impl<T: LayoutExtractor + ?Sized> LayoutExtractor for Box<T> {
    fn extract(&self, path: &Path) -> Result<Vec<PageContent>> {
        (**self).extract(path)
    }
}
