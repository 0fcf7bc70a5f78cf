//! Persona-driven section ranking.
//!
//! Pages are segmented into candidate sections, every section is scored
//! against the job description, and the top of the ranking is assembled
//! into a [`RankingOutput`].

mod assemble;
pub mod embed;
mod scorer;
mod segment;

pub use assemble::{assemble, format_timestamp, AssemblyLimits};
pub use embed::{
    cosine_similarity, Embedder, EmbeddingModels, HashEmbedder, HashEmbedderConfig, HashFeatures,
    DEFAULT_DIMENSIONS,
};
pub use scorer::{keyword_score, sort_by_importance, RelevanceScorer, ScoringWeights};
pub use segment::{
    split_paragraphs, AbbreviationAwareSplitter, SectionSegmenter, SegmenterConfig,
    SentenceSplitter, DEFAULT_LABEL_MAX_WORDS, DEFAULT_SENTENCE_MIN_WORDS,
};

use chrono::Utc;

use crate::error::Result;
use crate::model::{PageContent, RankingOutput, ScoredSection, Section, TaskDescriptor};

/// Tunables for a ranking run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankOptions {
    /// Section word-count cutoffs
    pub segmenter: SegmenterConfig,
    /// Importance score weights
    pub weights: ScoringWeights,
    /// Output sizes
    pub limits: AssemblyLimits,
}

impl RankOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set segmentation cutoffs.
    pub fn with_segmenter(mut self, config: SegmenterConfig) -> Self {
        self.segmenter = config;
        self
    }

    /// Set score weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set output limits.
    pub fn with_limits(mut self, limits: AssemblyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of entries in `extracted_sections`.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.limits.extracted_sections = n;
        self
    }

    /// Number of entries in `sub_section_analysis`.
    pub fn with_top_sub_sections(mut self, n: usize) -> Self {
        self.limits.sub_sections = n;
        self
    }
}

/// An extracted document ready for ranking.
#[derive(Debug, Clone)]
pub struct RankedDocument {
    /// Base file name
    pub name: String,
    /// Extracted pages
    pub pages: Vec<PageContent>,
}

impl RankedDocument {
    /// Create a document.
    pub fn new(name: impl Into<String>, pages: Vec<PageContent>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }
}

/// Segments, scores and assembles in one go.
pub struct PersonaAnalyzer {
    segmenter: SectionSegmenter,
    scorer: RelevanceScorer,
    limits: AssemblyLimits,
}

impl PersonaAnalyzer {
    /// Create an analyzer with default options.
    pub fn new(models: EmbeddingModels) -> Self {
        Self::with_options(models, RankOptions::default())
    }

    /// Create an analyzer with custom options.
    pub fn with_options(models: EmbeddingModels, options: RankOptions) -> Self {
        if !models.supports_multilingual() {
            log::info!(
                "no multilingual model, all text uses {}",
                models.primary().name()
            );
        }
        Self {
            segmenter: SectionSegmenter::new().with_config(options.segmenter),
            scorer: RelevanceScorer::new(models).with_weights(options.weights),
            limits: options.limits,
        }
    }

    /// Replace the segmenter, e.g. to plug in a different sentence splitter.
    pub fn with_segmenter(mut self, segmenter: SectionSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// All candidate sections, in document, page, then in-page order.
    pub fn sections(&self, documents: &[RankedDocument]) -> Vec<Section> {
        documents
            .iter()
            .flat_map(|doc| self.segmenter.segment_document(&doc.pages, &doc.name))
            .collect()
    }

    /// Score and sort all candidate sections.
    pub fn rank(&self, documents: &[RankedDocument], job: &str) -> Result<Vec<ScoredSection>> {
        let sections = self.sections(documents);
        log::debug!(
            "{} candidate sections across {} documents",
            sections.len(),
            documents.len()
        );
        self.scorer.score(sections, job)
    }

    /// Full analysis: rank, then assemble with the current UTC time.
    pub fn analyze(&self, documents: &[RankedDocument], task: &TaskDescriptor) -> Result<RankingOutput> {
        let ranked = self.rank(documents, &task.job_to_be_done)?;
        let names = documents.iter().map(|d| d.name.clone()).collect();
        Ok(assemble(names, task, &ranked, &self.limits, Utc::now()))
    }
}
