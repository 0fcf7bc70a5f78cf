//! Relevance scoring of sections against a job description.

use crate::error::Result;
use crate::model::{ScoredSection, Section};
use crate::text::{contains_cjk, word_tokens};

use super::embed::{cosine_similarity, EmbeddingModels};

/// Blend weights for the importance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight of the cosine similarity
    pub semantic: f64,
    /// Weight of the keyword overlap
    pub keyword: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.8,
            keyword: 0.2,
        }
    }
}

impl ScoringWeights {
    /// Weighted blend of the two signals, in double precision.
    pub fn combine(&self, similarity: f64, keyword_score: f64) -> f64 {
        similarity * self.semantic + keyword_score * self.keyword
    }
}

/// Fraction of job tokens found as substrings of the lower-cased text.
///
/// Tokens count positionally, so a repeated job word counts twice. An empty
/// token list scores 0.
pub fn keyword_score(job_tokens: &[String], text: &str) -> f64 {
    if job_tokens.is_empty() {
        return 0.0;
    }
    let lowered = text.to_lowercase();
    let hits = job_tokens
        .iter()
        .filter(|token| lowered.contains(token.as_str()))
        .count();
    hits as f64 / job_tokens.len() as f64
}

/// Scores sections by semantic similarity and keyword overlap.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    models: EmbeddingModels,
    weights: ScoringWeights,
}

impl RelevanceScorer {
    /// Create a scorer with default weights.
    pub fn new(models: EmbeddingModels) -> Self {
        Self {
            models,
            weights: ScoringWeights::default(),
        }
    }

    /// Use custom weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The embedding models in use.
    pub fn models(&self) -> &EmbeddingModels {
        &self.models
    }

    /// Score every section and sort by importance, highest first.
    ///
    /// The job is embedded once, with the model its own script selects, and
    /// that vector is compared against every section regardless of the
    /// section's script. Equal scores keep encounter order.
    pub fn score(&self, sections: Vec<Section>, job: &str) -> Result<Vec<ScoredSection>> {
        let job_model = self.models.model_for(job);
        log::debug!("embedding job with {}", job_model.name());
        let job_embedding = job_model.embed(job)?;
        let job_tokens = word_tokens(job);

        let mut scored = Vec::with_capacity(sections.len());
        for section in sections {
            let embedding = self.models.embed(&section.text)?;
            let similarity = cosine_similarity(&job_embedding, &embedding);
            let keywords = keyword_score(&job_tokens, &section.text);
            let is_english = !contains_cjk(&section.text);

            scored.push(ScoredSection {
                importance_score: self.weights.combine(f64::from(similarity), keywords),
                is_english,
                section,
            });
        }

        sort_by_importance(&mut scored);
        Ok(scored)
    }
}

/// Stable sort, highest importance first.
pub fn sort_by_importance(sections: &mut [ScoredSection]) {
    sections.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));
}
