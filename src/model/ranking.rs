//! Persona analysis input and output types.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Who is reading and what they need to get done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Persona description, carried into metadata only
    #[serde(default)]
    pub persona: String,

    /// The query sections are ranked against
    #[serde(default)]
    pub job_to_be_done: String,
}

impl TaskDescriptor {
    /// Create a task descriptor.
    pub fn new(persona: impl Into<String>, job_to_be_done: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
        }
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid task descriptor: {}", e)))
    }

    /// Read a descriptor file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    /// Base file names of the analysed documents
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// UTC time the output was assembled
    pub processing_timestamp: String,
}

/// One entry of the top-ranked section list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page_number: u32,
    /// Section text, cut to the title limit
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: u32,
    /// "en" or "multilingual"
    pub language: String,
}

/// One refined excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSectionAnalysis {
    pub document: String,
    pub page_number: u32,
    /// Whitespace-normalized section text
    pub refined_text: String,
    /// Importance score with two decimals
    pub relevance_to_job: String,
}

/// Result of a persona analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutput {
    pub metadata: RankingMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub sub_section_analysis: Vec<SubSectionAnalysis>,
}
