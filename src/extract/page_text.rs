//! Reading-order page text with paragraph breaks.

use std::collections::BTreeMap;

use crate::model::{Line, WordRun};

/// Spacing assumed when a page has fewer than two lines.
const DEFAULT_LINE_SPACING: f32 = 12.0;

/// Visual lines in reading order: top to bottom, words left to right.
pub fn visual_lines(words: &[WordRun]) -> Vec<Line> {
    let mut by_key: BTreeMap<i64, Vec<WordRun>> = BTreeMap::new();
    for word in words {
        by_key.entry(word.line_key()).or_default().push(word.clone());
    }

    by_key
        .into_values()
        .map(|mut words| {
            words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            Line::new(words)
        })
        .collect()
}

fn line_top(line: &Line) -> f32 {
    line.words.first().map(|w| w.top).unwrap_or(0.0)
}

fn line_left(line: &Line) -> f32 {
    line.words.first().map(|w| w.x0).unwrap_or(0.0)
}

fn avg_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (line_top(&w[1]) - line_top(&w[0])).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return DEFAULT_LINE_SPACING;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Whether `curr` starts a new paragraph after `prev`.
fn should_break_paragraph(prev: &Line, curr: &Line, avg_spacing: f32) -> bool {
    // Weight change marks a heading boundary
    if prev.is_bold() != curr.is_bold() {
        return true;
    }

    let spacing = (line_top(curr) - line_top(prev)).abs();
    if spacing > avg_spacing * 1.5 {
        return true;
    }

    if (prev.avg_font_size() - curr.avg_font_size()).abs() > 1.0 {
        return true;
    }

    (line_left(prev) - line_left(curr)).abs() > 20.0
}

/// Page text: lines joined by `\n`, paragraphs separated by a blank line.
pub fn render_page_text(words: &[WordRun]) -> String {
    let lines = visual_lines(words);
    let avg_spacing = avg_line_spacing(&lines);

    let mut text = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            if should_break_paragraph(&lines[idx - 1], line, avg_spacing) {
                text.push_str("\n\n");
            } else {
                text.push('\n');
            }
        }
        text.push_str(&line.text());
    }
    text
}
