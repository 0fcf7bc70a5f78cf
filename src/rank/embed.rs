//! Embedding models and vector similarity.
//!
//! Models are plain trait objects handed to the scorer, so tests and callers
//! can plug in any backend. [`HashEmbedder`] is the built-in backend: a
//! feature-hashing embedder that needs no model files.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::text::{contains_cjk, normalize_whitespace, word_tokens};

/// Default embedding width for the built-in models.
pub const DEFAULT_DIMENSIONS: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Maps text to a fixed-size vector.
pub trait Embedder: Send + Sync {
    /// Model name, used in logs.
    fn name(&self) -> &str;

    /// Embed one string.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Cosine similarity of two vectors.
///
/// Returns 0 when either vector is empty or has zero norm. Vectors of
/// different length are compared over their common prefix.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let (a, b) = (&a[..len], &b[..len]);
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// What a [`HashEmbedder`] hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFeatures {
    /// Lower-cased word tokens. Works for space-delimited scripts.
    Words,
    /// Overlapping character n-grams. Script-agnostic.
    CharNgrams(usize),
}

/// Configuration for [`HashEmbedder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedderConfig {
    pub dimensions: usize,
    pub seed: u64,
    pub features: HashFeatures,
}

impl Default for HashEmbedderConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            seed: 0,
            features: HashFeatures::Words,
        }
    }
}

/// Feature-hashing embedder.
///
/// Every feature is hashed (FNV-1a, seeded) to a bucket and a sign; the
/// resulting vector is L2-normalized. Deterministic across runs and
/// platforms.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    config: HashEmbedderConfig,
    name: String,
}

impl HashEmbedder {
    /// Create an embedder from a config.
    pub fn new(config: HashEmbedderConfig) -> Self {
        let name = match config.features {
            HashFeatures::Words => format!("hash-words-{}", config.dimensions),
            HashFeatures::CharNgrams(n) => format!("hash-char{}-{}", n, config.dimensions),
        };
        Self { config, name }
    }

    /// Word-token model, the primary (Latin-script) path.
    pub fn primary(dimensions: usize) -> Self {
        Self::new(HashEmbedderConfig {
            dimensions,
            ..Default::default()
        })
    }

    /// Character-trigram model, the multilingual path.
    pub fn multilingual(dimensions: usize) -> Self {
        Self::new(HashEmbedderConfig {
            dimensions,
            seed: 1,
            features: HashFeatures::CharNgrams(3),
        })
    }

    /// The embedder's config.
    pub fn config(&self) -> &HashEmbedderConfig {
        &self.config
    }

    fn features(&self, text: &str) -> Vec<String> {
        match self.config.features {
            HashFeatures::Words => word_tokens(text),
            HashFeatures::CharNgrams(n) => char_ngrams(text, n.max(1)),
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hash = FNV_OFFSET ^ self.config.seed;
        for byte in feature.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let dims = self.config.dimensions;
        if dims == 0 {
            return Err(Error::Embedding(format!(
                "{}: dimensions must be positive",
                self.name
            )));
        }

        let mut vector = vec![0.0f32; dims];
        for feature in self.features(text) {
            let hash = self.hash(&feature);
            let bucket = (hash % dims as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}

/// Character n-grams of the lower-cased, whitespace-normalized text,
/// padded with a space on each side. Text shorter than `n` is one feature.
fn char_ngrams(text: &str, n: usize) -> Vec<String> {
    let normalized = normalize_whitespace(&text.to_lowercase());
    if normalized.is_empty() {
        return Vec::new();
    }

    let padded: Vec<char> = format!(" {} ", normalized).chars().collect();
    if padded.len() <= n {
        return vec![padded.into_iter().collect()];
    }
    padded.windows(n).map(|w| w.iter().collect()).collect()
}

/// The primary model plus an optional multilingual model.
///
/// Without a multilingual model every text goes through the primary one;
/// [`EmbeddingModels::supports_multilingual`] reports which case applies.
#[derive(Clone)]
pub struct EmbeddingModels {
    primary: Arc<dyn Embedder>,
    multilingual: Option<Arc<dyn Embedder>>,
}

impl EmbeddingModels {
    /// Models with only a primary embedder.
    pub fn new(primary: Arc<dyn Embedder>) -> Self {
        Self {
            primary,
            multilingual: None,
        }
    }

    /// Add a multilingual embedder.
    pub fn with_multilingual(mut self, multilingual: Arc<dyn Embedder>) -> Self {
        self.multilingual = Some(multilingual);
        self
    }

    /// Built-in hash embedders for both paths.
    pub fn hashed(dimensions: usize) -> Self {
        Self::new(Arc::new(HashEmbedder::primary(dimensions)))
            .with_multilingual(Arc::new(HashEmbedder::multilingual(dimensions)))
    }

    /// Whether a dedicated multilingual model is available.
    pub fn supports_multilingual(&self) -> bool {
        self.multilingual.is_some()
    }

    /// The primary model.
    pub fn primary(&self) -> &dyn Embedder {
        self.primary.as_ref()
    }

    /// The model used for `text`: multilingual for CJK text when available,
    /// otherwise primary.
    pub fn model_for(&self, text: &str) -> &dyn Embedder {
        match &self.multilingual {
            Some(model) if contains_cjk(text) => model.as_ref(),
            _ => self.primary.as_ref(),
        }
    }

    /// Embed `text` with the model [`EmbeddingModels::model_for`] picks.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.model_for(text).embed(text)
    }
}

impl std::fmt::Debug for EmbeddingModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingModels")
            .field("primary", &self.primary.name())
            .field(
                "multilingual",
                &self.multilingual.as_ref().map(|m| m.name().to_string()),
            )
            .finish()
    }
}
