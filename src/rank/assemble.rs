//! Assembly of the persona analysis output.

use chrono::{DateTime, Utc};

use crate::model::{
    ExtractedSection, RankingMetadata, RankingOutput, ScoredSection, SubSectionAnalysis,
    TaskDescriptor,
};
use crate::text::{normalize_whitespace, truncate_with_ellipsis};

/// How much of the ranking ends up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyLimits {
    /// Entries in `extracted_sections`
    pub extracted_sections: usize,
    /// Entries in `sub_section_analysis`
    pub sub_sections: usize,
    /// Characters kept in a section title before the ellipsis
    pub title_chars: usize,
}

impl Default for AssemblyLimits {
    fn default() -> Self {
        Self {
            extracted_sections: 20,
            sub_sections: 10,
            title_chars: 100,
        }
    }
}

/// ISO-8601 UTC timestamp with microseconds and no offset,
/// e.g. `2024-05-01T09:30:00.123456`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Build the output from ranked sections.
///
/// `ranked` must already be sorted by importance.
pub fn assemble(
    input_documents: Vec<String>,
    task: &TaskDescriptor,
    ranked: &[ScoredSection],
    limits: &AssemblyLimits,
    timestamp: DateTime<Utc>,
) -> RankingOutput {
    let extracted_sections = ranked
        .iter()
        .take(limits.extracted_sections)
        .enumerate()
        .map(|(idx, scored)| ExtractedSection {
            document: scored.section.document.clone(),
            page_number: scored.section.page,
            section_title: truncate_with_ellipsis(&scored.section.text, limits.title_chars),
            importance_rank: idx as u32 + 1,
            language: scored.language().to_string(),
        })
        .collect();

    let sub_section_analysis = ranked
        .iter()
        .take(limits.sub_sections)
        .map(|scored| SubSectionAnalysis {
            document: scored.section.document.clone(),
            page_number: scored.section.page,
            refined_text: normalize_whitespace(&scored.section.text),
            relevance_to_job: format!("{:.2}", scored.importance_score),
        })
        .collect();

    RankingOutput {
        metadata: RankingMetadata {
            input_documents,
            persona: task.persona.clone(),
            job_to_be_done: task.job_to_be_done.clone(),
            processing_timestamp: format_timestamp(timestamp),
        },
        extracted_sections,
        sub_section_analysis,
    }
}
