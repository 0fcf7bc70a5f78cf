//! Outline building: title plus typography-classified headings.

mod classifier;
mod title;

pub use classifier::{
    classify_page, clean_heading_text, group_into_lines, page_average_size, HeadingThresholds,
    DEFAULT_H1_RATIO, DEFAULT_H2_RATIO, DEFAULT_H3_RATIO,
};
pub use title::{document_title, extract_title};

use crate::model::{Outline, PageContent};

/// Tunables for outline building.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutlineOptions {
    /// Heading size ratios
    pub thresholds: HeadingThresholds,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the H1 ratio.
    pub fn with_h1_ratio(mut self, ratio: f32) -> Self {
        self.thresholds = self.thresholds.with_h1_ratio(ratio);
        self
    }

    /// Set the H2 ratio.
    pub fn with_h2_ratio(mut self, ratio: f32) -> Self {
        self.thresholds = self.thresholds.with_h2_ratio(ratio);
        self
    }

    /// Set the H3 ratio.
    pub fn with_h3_ratio(mut self, ratio: f32) -> Self {
        self.thresholds = self.thresholds.with_h3_ratio(ratio);
        self
    }
}

/// Builds an [`Outline`] from extracted pages.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    thresholds: HeadingThresholds,
}

impl OutlineBuilder {
    /// Create a builder with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from options.
    pub fn with_options(options: OutlineOptions) -> Self {
        Self {
            thresholds: options.thresholds,
        }
    }

    /// Use custom heading thresholds.
    pub fn with_thresholds(mut self, thresholds: HeadingThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> &HeadingThresholds {
        &self.thresholds
    }

    /// Build the outline. Pages without words contribute no headings.
    pub fn build(&self, pages: &[PageContent]) -> Outline {
        let mut outline = Outline::new(document_title(pages));

        for page in pages {
            if page.words.is_empty() {
                log::debug!("page {} has no words, skipping", page.number);
                continue;
            }
            outline.extend(classify_page(&page.words, page.number, &self.thresholds));
        }

        log::debug!(
            "outline {:?}: {} headings",
            outline.title,
            outline.len()
        );
        outline
    }
}
