//! Data model shared by the outline and ranking pipelines.
//!
//! Word runs and pages come out of layout extraction; outlines, sections and
//! ranking output are what the two pipelines produce from them.

mod outline;
mod ranking;
mod section;
mod word;

pub use outline::{HeadingEntry, HeadingLevel, Outline};
pub use ranking::{
    ExtractedSection, RankingMetadata, RankingOutput, SubSectionAnalysis, TaskDescriptor,
};
pub use section::{ScoredSection, Section, SectionKind};
pub use word::{Line, PageContent, WordRun};
