//! Splitting page text into candidate sections.
//!
//! A paragraph is either kept whole as a label (short and upper-case or
//! colon-terminated, the headings and captions plain text extraction does
//! not mark) or split into sentences, of which only the longer ones are kept.

use crate::model::{PageContent, Section};
use crate::text::is_all_uppercase;

/// Default: labels must have fewer words than this.
pub const DEFAULT_LABEL_MAX_WORDS: usize = 15;
/// Default: sentences must have more words than this.
pub const DEFAULT_SENTENCE_MIN_WORDS: usize = 5;

/// Word-count cutoffs for the two section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// A label paragraph has strictly fewer words than this
    pub label_max_words: usize,
    /// A sentence is kept only with strictly more words than this
    pub sentence_min_words: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            label_max_words: DEFAULT_LABEL_MAX_WORDS,
            sentence_min_words: DEFAULT_SENTENCE_MIN_WORDS,
        }
    }
}

/// Splits a paragraph into sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Split `paragraph` into sentences, in order.
    fn split(&self, paragraph: &str) -> Vec<String>;
}

/// Splits after `.` or `?` followed by whitespace, unless the period ends an
/// abbreviation such as `e.g.` or `Mr.`.
///
/// Only the single whitespace character at the boundary is consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbbreviationAwareSplitter;

impl AbbreviationAwareSplitter {
    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    /// `w.w.` right before the boundary, as in "e.g." or "i.e.".
    fn ends_dotted_abbreviation(chars: &[char], boundary: usize) -> bool {
        boundary >= 4
            && Self::is_word_char(chars[boundary - 4])
            && chars[boundary - 3] == '.'
            && Self::is_word_char(chars[boundary - 2])
    }

    /// `Xx.` right before the boundary, as in "Mr." or "Dr.".
    fn ends_title_abbreviation(chars: &[char], boundary: usize) -> bool {
        boundary >= 3
            && chars[boundary - 3].is_ascii_uppercase()
            && chars[boundary - 2].is_ascii_lowercase()
            && chars[boundary - 1] == '.'
    }
}

impl SentenceSplitter for AbbreviationAwareSplitter {
    fn split(&self, paragraph: &str) -> Vec<String> {
        let chars: Vec<char> = paragraph.chars().collect();
        let mut sentences = Vec::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            let is_boundary = c.is_whitespace()
                && i > 0
                && matches!(chars[i - 1], '.' | '?')
                && !Self::ends_dotted_abbreviation(&chars, i)
                && !Self::ends_title_abbreviation(&chars, i);

            if is_boundary {
                sentences.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        sentences.push(current);

        sentences
    }
}

/// Paragraphs separated by blank lines, trimmed, empty ones dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Turns page text into [`Section`]s.
pub struct SectionSegmenter {
    config: SegmenterConfig,
    splitter: Box<dyn SentenceSplitter>,
}

impl SectionSegmenter {
    /// Create a segmenter with default cutoffs and sentence splitting.
    pub fn new() -> Self {
        Self {
            config: SegmenterConfig::default(),
            splitter: Box::new(AbbreviationAwareSplitter),
        }
    }

    /// Use custom cutoffs.
    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different sentence splitter.
    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Current cutoffs.
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Check if a paragraph should be kept whole as a label.
    pub fn is_label(&self, paragraph: &str) -> bool {
        paragraph.split_whitespace().count() < self.config.label_max_words
            && (is_all_uppercase(paragraph) || paragraph.ends_with(':'))
    }

    /// Sections of one page.
    pub fn segment_page(&self, text: &str, page: u32, document: &str) -> Vec<Section> {
        let mut sections = Vec::new();

        for paragraph in split_paragraphs(text) {
            if self.is_label(paragraph) {
                sections.push(Section::label(paragraph, page, document));
                continue;
            }

            sections.extend(
                self.splitter
                    .split(paragraph)
                    .into_iter()
                    .filter(|s| s.split_whitespace().count() > self.config.sentence_min_words)
                    .map(|s| Section::sentence(s, page, document)),
            );
        }

        sections
    }

    /// Sections of a whole document, in page order.
    pub fn segment_document(&self, pages: &[PageContent], document: &str) -> Vec<Section> {
        pages
            .iter()
            .filter(|page| !page.text.trim().is_empty())
            .flat_map(|page| self.segment_page(&page.text, page.number, document))
            .collect()
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
