//! Candidate sections for relevance ranking.

use serde::{Deserialize, Serialize};

/// How a section was cut out of its paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Short upper-case or colon-terminated paragraph, kept verbatim
    Label,
    /// Sentence split out of a longer paragraph
    Sentence,
}

/// A candidate span of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Base file name of the source document
    pub document: String,

    /// Provenance
    pub kind: SectionKind,
}

impl Section {
    /// Create a label section.
    pub fn label(text: impl Into<String>, page: u32, document: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page,
            document: document.into(),
            kind: SectionKind::Label,
        }
    }

    /// Create a sentence section.
    pub fn sentence(text: impl Into<String>, page: u32, document: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page,
            document: document.into(),
            kind: SectionKind::Sentence,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A section with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    /// The scored section
    #[serde(flatten)]
    pub section: Section,

    /// 0.8 x similarity + 0.2 x keyword overlap with the default weights
    pub importance_score: f64,

    /// False when the text contains CJK characters
    pub is_english: bool,
}

impl ScoredSection {
    /// Language tag used in ranking output.
    pub fn language(&self) -> &'static str {
        if self.is_english {
            "en"
        } else {
            "multilingual"
        }
    }
}
