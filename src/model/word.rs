//! Word-level types produced by layout extraction.

use serde::{Deserialize, Serialize};

/// A single extracted word with its typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRun {
    /// The word text
    pub text: String,

    /// Distance from the top of the page to the top of the word
    pub top: f32,

    /// Left edge of the word
    #[serde(default)]
    pub x0: f32,

    /// Font size in points
    pub font_size: f32,

    /// Whether the font appears to be bold
    pub is_bold: bool,

    /// Whether the font appears to be italic
    pub is_italic: bool,

    /// Page number (1-indexed)
    pub page: u32,
}

impl WordRun {
    /// Create a regular-weight word.
    pub fn new(text: impl Into<String>, top: f32, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            top,
            x0: 0.0,
            font_size,
            is_bold: false,
            is_italic: false,
            page,
        }
    }

    /// Mark the word as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the word as italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Set the left edge.
    pub fn at_x(mut self, x0: f32) -> Self {
        self.x0 = x0;
        self
    }

    /// Vertical position rounded to the nearest unit, ties to even.
    ///
    /// This is the key words are grouped into lines by.
    pub fn line_key(&self) -> i64 {
        self.top.round_ties_even() as i64
    }
}

/// Words that share a rounded vertical position.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// Words in encounter order
    pub words: Vec<WordRun>,
}

impl Line {
    /// Create a line from words.
    pub fn new(words: Vec<WordRun>) -> Self {
        Self { words }
    }

    /// Words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Mean font size of the line's words (0 for an empty line).
    pub fn avg_font_size(&self) -> f32 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.words.iter().map(|w| w.font_size).sum::<f32>() / self.words.len() as f32
    }

    /// True if any word in the line is bold.
    pub fn is_bold(&self) -> bool {
        self.words.iter().any(|w| w.is_bold)
    }

    /// Check if the line has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// One page as yielded by a layout extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Words in reading order
    pub words: Vec<WordRun>,

    /// Plain-text rendering, paragraphs separated by blank lines
    pub text: String,
}

impl PageContent {
    /// Create a page from its words and text.
    pub fn new(number: u32, words: Vec<WordRun>, text: impl Into<String>) -> Self {
        Self {
            number,
            words,
            text: text.into(),
        }
    }

    /// Check if the page has neither words nor text.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.text.trim().is_empty()
    }
}
