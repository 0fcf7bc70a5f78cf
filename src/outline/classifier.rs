//! Typography-based heading classification.
//!
//! Each page is judged against its own mean font size, so a document with
//! small body text and one with large body text get comparable outlines.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{HeadingEntry, HeadingLevel, Line, WordRun};
use crate::text::normalize_whitespace;

/// Default size ratio over the page average for H1.
pub const DEFAULT_H1_RATIO: f32 = 1.5;
/// Default size ratio over the page average for H2.
pub const DEFAULT_H2_RATIO: f32 = 1.3;
/// Default size ratio over the page average for H3.
pub const DEFAULT_H3_RATIO: f32 = 1.1;

/// Size ratios a bold line must exceed to reach each heading level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingThresholds {
    pub h1_ratio: f32,
    pub h2_ratio: f32,
    pub h3_ratio: f32,
}

impl HeadingThresholds {
    /// Create thresholds with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the H1 ratio.
    pub fn with_h1_ratio(mut self, ratio: f32) -> Self {
        self.h1_ratio = ratio;
        self
    }

    /// Set the H2 ratio.
    pub fn with_h2_ratio(mut self, ratio: f32) -> Self {
        self.h2_ratio = ratio;
        self
    }

    /// Set the H3 ratio.
    pub fn with_h3_ratio(mut self, ratio: f32) -> Self {
        self.h3_ratio = ratio;
        self
    }

    /// Classify a line given its mean size, weight and the page mean.
    ///
    /// Evaluated top to bottom, first match wins. A bold line that fails
    /// every size test is still H3.
    pub fn classify(&self, avg_line_size: f32, is_bold: bool, avg_size: f32) -> Option<HeadingLevel> {
        if avg_line_size > avg_size * self.h1_ratio && is_bold {
            Some(HeadingLevel::H1)
        } else if avg_line_size > avg_size * self.h2_ratio && is_bold {
            Some(HeadingLevel::H2)
        } else if (avg_line_size > avg_size * self.h3_ratio && is_bold) || is_bold {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }
}

impl Default for HeadingThresholds {
    fn default() -> Self {
        Self {
            h1_ratio: DEFAULT_H1_RATIO,
            h2_ratio: DEFAULT_H2_RATIO,
            h3_ratio: DEFAULT_H3_RATIO,
        }
    }
}

/// Mean font size across all words of a page.
pub fn page_average_size(words: &[WordRun]) -> Option<f32> {
    if words.is_empty() {
        return None;
    }
    Some(words.iter().map(|w| w.font_size).sum::<f32>() / words.len() as f32)
}

/// Group words by rounded vertical position.
///
/// Lines come out in the order their first word was encountered; words keep
/// their input order inside a line. Distinct lines that round to the same
/// position are merged.
pub fn group_into_lines(words: &[WordRun]) -> Vec<Line> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut lines: Vec<Line> = Vec::new();

    for word in words {
        let slot = *index.entry(word.line_key()).or_insert_with(|| {
            lines.push(Line::default());
            lines.len() - 1
        });
        lines[slot].words.push(word.clone());
    }

    lines
}

fn leading_digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\s*").expect("valid regex"))
}

/// Collapse whitespace, trim, and drop a leading number prefix.
///
/// `"12   Results"` becomes `"Results"`.
pub fn clean_heading_text(text: &str) -> String {
    let collapsed = normalize_whitespace(text);
    leading_digits_re().replace(&collapsed, "").into_owned()
}

/// Classify every line of a page.
///
/// Returns headings in line-processing order. A page without words yields
/// nothing.
pub fn classify_page(words: &[WordRun], page: u32, thresholds: &HeadingThresholds) -> Vec<HeadingEntry> {
    let Some(avg_size) = page_average_size(words) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for line in group_into_lines(words) {
        let Some(level) = thresholds.classify(line.avg_font_size(), line.is_bold(), avg_size) else {
            continue;
        };
        let text = clean_heading_text(&line.text());
        log::trace!("page {}: {} {:?}", page, level, text);
        entries.push(HeadingEntry::new(level, text, page));
    }
    entries
}
