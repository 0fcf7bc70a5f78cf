//! lopdf-backed layout extraction.

use std::path::Path;

use lopdf::Document as LopdfDocument;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{PageContent, WordRun};

use super::detect::pdf_version_from_path;
use super::layout::{extract_spans, page_content, page_height, TextSpan};
use super::options::{ErrorMode, ExtractOptions};
use super::page_text::render_page_text;
use super::LayoutExtractor;

/// Ascent as a fraction of the font size, used to place the top of a word.
const ASCENT_RATIO: f32 = 0.8;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.5;

/// Extracts positioned words from PDF content streams.
#[derive(Debug, Clone, Default)]
pub struct LopdfExtractor {
    options: ExtractOptions,
}

impl LopdfExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The extractor's options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract pages from an in-memory PDF.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Vec<PageContent>> {
        let doc = LopdfDocument::load_mem(data)?;
        self.extract_document(&doc)
    }

    fn extract_document(&self, doc: &LopdfDocument) -> Result<Vec<PageContent>> {
        let pages = doc.get_pages();
        let mut out = Vec::with_capacity(pages.len());

        for (page_num, page_id) in pages {
            match self.extract_page(doc, page_num, page_id) {
                Ok(page) => out.push(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract page {}: {}", page_num, e);
                    out.push(PageContent::new(page_num, Vec::new(), ""));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    fn extract_page(
        &self,
        doc: &LopdfDocument,
        page_num: u32,
        page_id: lopdf::ObjectId,
    ) -> Result<PageContent> {
        let height = page_height(doc, page_id);
        let content = page_content(doc, page_id)?;
        let spans = extract_spans(doc, page_id, &content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;

        let mut words: Vec<WordRun> = spans
            .iter()
            .flat_map(|span| span_words(span, height, page_num))
            .collect();
        sort_reading_order(&mut words);
        let text = render_page_text(&words);
        log::trace!("page {}: {} words", page_num, words.len());

        Ok(PageContent::new(page_num, words, text))
    }
}

impl LayoutExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<PageContent>> {
        if let Err(e) = pdf_version_from_path(path) {
            log::warn!("{}: {}, trying anyway", path.display(), e);
        }

        let doc = LopdfDocument::load(path)?;
        self.extract_document(&doc)
    }
}

/// Top to bottom by rounded line position, then left to right. Stable, so
/// words at the same spot keep their draw order.
fn sort_reading_order(words: &mut [WordRun]) {
    words.sort_by(|a, b| {
        a.line_key()
            .cmp(&b.line_key())
            .then_with(|| a.x0.total_cmp(&b.x0))
    });
}

/// Split a span into words. The left edge of each word is estimated from
/// its character offset within the span.
fn span_words(span: &TextSpan, page_height: f32, page: u32) -> Vec<WordRun> {
    let top = page_height - (span.y + span.font_size * ASCENT_RATIO);
    let char_width = span.font_size * CHAR_WIDTH_RATIO;

    let mut words = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;

    let mut flush = |current: &mut String, start: usize| {
        if current.is_empty() {
            return;
        }
        let text: String = current.nfc().collect();
        let mut word = WordRun::new(text, top, span.font_size, page)
            .at_x(span.x + start as f32 * char_width);
        word.is_bold = span.is_bold;
        word.is_italic = span.is_italic;
        words.push(word);
        current.clear();
    };

    for (idx, c) in span.text.chars().enumerate() {
        if c.is_whitespace() {
            flush(&mut current, start);
        } else {
            if current.is_empty() {
                start = idx;
            }
            current.push(c);
        }
    }
    flush(&mut current, start);

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// One page per entry, each a list of (font resource, size, x, y, text).
    fn build_pdf(pages: &[Vec<(&str, i64, i64, i64, &str)>]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids = Vec::new();
        for runs in pages {
            let mut operations = Vec::new();
            for (font, size, x, y, text) in runs {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![(*font).into(), (*size).into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, "Helvetica")
    }

    #[test]
    fn test_span_words_positions() {
        let words = span_words(&span("Budget  risks", 100.0, 700.0, 10.0), 792.0, 3);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Budget");
        assert_eq!(words[0].x0, 100.0);
        assert_eq!(words[1].text, "risks");
        assert_eq!(words[1].x0, 140.0);
        assert_eq!(words[0].top, 84.0);
        assert_eq!(words[0].page, 3);
    }

    #[test]
    fn test_span_words_normalizes_nfc() {
        let words = span_words(&span("Cafe\u{0301}", 0.0, 0.0, 10.0), 792.0, 1);
        assert_eq!(words[0].text, "Café");
    }

    #[test]
    fn test_extract_bytes_words_and_text() {
        let data = build_pdf(&[vec![
            ("F2", 18, 72, 700, "1 Introduction"),
            ("F1", 10, 72, 670, "Plain body text here."),
        ]]);
        let pages = LopdfExtractor::new().extract_bytes(&data).unwrap();

        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.number, 1);
        assert_eq!(page.words.len(), 6);
        assert_eq!(page.words[0].text, "1");
        assert!(page.words[0].is_bold);
        assert_eq!(page.words[0].font_size, 18.0);
        assert!(!page.words[2].is_bold);
        assert_eq!(page.text, "1 Introduction\n\nPlain body text here.");
    }

    #[test]
    fn test_words_follow_reading_order_not_draw_order() {
        let data = build_pdf(&[vec![
            ("F2", 14, 72, 600, "Second Heading"),
            ("F1", 10, 72, 650, "Body between headings."),
            ("F2", 14, 72, 700, "First Heading"),
        ]]);
        let pages = LopdfExtractor::new().extract_bytes(&data).unwrap();

        let texts: Vec<_> = pages[0].words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["First", "Heading", "Body", "between", "headings.", "Second", "Heading"]
        );
    }

    #[test]
    fn test_sort_reading_order_within_line() {
        let mut words = vec![
            WordRun::new("right", 100.0, 10.0, 1).at_x(300.0),
            WordRun::new("below", 120.0, 10.0, 1).at_x(10.0),
            WordRun::new("left", 100.2, 10.0, 1).at_x(50.0),
        ];
        sort_reading_order(&mut words);
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right", "below"]);
    }

    #[test]
    fn test_extract_bytes_multiple_pages() {
        let data = build_pdf(&[
            vec![("F1", 12, 72, 700, "First page")],
            vec![],
            vec![("F1", 12, 72, 700, "Third page")],
        ]);
        let pages = LopdfExtractor::new().extract_bytes(&data).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].text, "First page");
        assert!(pages[1].is_empty());
        assert_eq!(pages[2].number, 3);
        assert_eq!(pages[2].text, "Third page");
    }

    #[test]
    fn test_extract_bytes_rejects_garbage() {
        assert!(LopdfExtractor::new().extract_bytes(b"not a pdf").is_err());
    }

    #[test]
    fn test_extract_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, build_pdf(&[vec![("F1", 12, 72, 700, "Hello")]])).unwrap();

        let pages = LopdfExtractor::new().extract(&path).unwrap();
        assert_eq!(pages[0].words[0].text, "Hello");
    }
}
