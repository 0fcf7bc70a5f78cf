//! Document title extraction.

use crate::model::PageContent;

/// First non-empty line of the page text, trimmed.
///
/// Returns an empty string when the page has no text.
pub fn extract_title(first_page_text: &str) -> String {
    first_page_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Title of a document given its pages; empty when there is no first page.
pub fn document_title(pages: &[PageContent]) -> String {
    pages
        .first()
        .map(|page| extract_title(&page.text))
        .unwrap_or_default()
}
