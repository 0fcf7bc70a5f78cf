//! # pagesift
//!
//! Document outlines and persona-driven section ranking for PDF collections.
//!
//! Two pipelines share one layout-extraction step:
//!
//! - the **outline builder** classifies lines as H1/H2/H3 headings from their
//!   typography relative to the page, and takes the title from the first line
//!   of page 1;
//! - the **relevance ranker** cuts page text into labels and sentences, scores
//!   each against a job description with embeddings plus keyword overlap, and
//!   reports the best sections.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagesift::{outline_file, render, JsonFormat};
//!
//! fn main() -> pagesift::Result<()> {
//!     let outline = outline_file("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! Ranking a directory against a task:
//!
//! ```no_run
//! use std::path::Path;
//! use pagesift::{pipeline, EmbeddingModels, LopdfExtractor, PersonaAnalyzer, PipelineOptions};
//!
//! let analyzer = PersonaAnalyzer::new(EmbeddingModels::hashed(384));
//! let written = pipeline::run_persona_analysis(
//!     Path::new("input"),
//!     Path::new("input/task.json"),
//!     Path::new("output"),
//!     &LopdfExtractor::new(),
//!     &analyzer,
//!     &PipelineOptions::default(),
//! )?;
//! println!("wrote {}", written.display());
//! # Ok::<(), pagesift::Error>(())
//! ```

pub mod error;
pub mod extract;
pub mod model;
pub mod outline;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{ErrorMode, ExtractOptions, LayoutExtractor, LopdfExtractor};
pub use model::{
    ExtractedSection, HeadingEntry, HeadingLevel, Line, Outline, PageContent, RankingMetadata,
    RankingOutput, ScoredSection, Section, SectionKind, SubSectionAnalysis, TaskDescriptor,
    WordRun,
};
pub use outline::{HeadingThresholds, OutlineBuilder, OutlineOptions};
pub use pipeline::PipelineOptions;
pub use rank::{
    Embedder, EmbeddingModels, HashEmbedder, PersonaAnalyzer, RankOptions, RankedDocument,
    RelevanceScorer, SectionSegmenter,
};
pub use render::JsonFormat;

use std::path::Path;

/// Extract a PDF file into pages of words and text.
///
/// # Example
///
/// ```no_run
/// let pages = pagesift::extract_pages("document.pdf").unwrap();
/// println!("Pages: {}", pages.len());
/// ```
pub fn extract_pages<P: AsRef<Path>>(path: P) -> Result<Vec<PageContent>> {
    LopdfExtractor::new().extract(path.as_ref())
}

/// Build the outline of a PDF file with default thresholds.
///
/// # Example
///
/// ```no_run
/// let outline = pagesift::outline_file("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    outline_file_with_options(path, OutlineOptions::default())
}

/// Build the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pagesift::{outline_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_h1_ratio(1.8);
/// let outline = outline_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn outline_file_with_options<P: AsRef<Path>>(path: P, options: OutlineOptions) -> Result<Outline> {
    let pages = extract_pages(path)?;
    Ok(OutlineBuilder::with_options(options).build(&pages))
}

/// Build the outline of an in-memory PDF.
pub fn outline_bytes(data: &[u8]) -> Result<Outline> {
    let pages = LopdfExtractor::new().extract_bytes(data)?;
    Ok(OutlineBuilder::new().build(&pages))
}

/// Rank the sections of PDF files against a task with the built-in
/// embedders.
///
/// # Example
///
/// ```no_run
/// use pagesift::{rank_files, TaskDescriptor};
///
/// let task = TaskDescriptor::new("Travel planner", "Plan a 4-day trip");
/// let output = rank_files(&["guide.pdf", "cities.pdf"], &task).unwrap();
/// println!("{}", output.extracted_sections[0].section_title);
/// ```
pub fn rank_files<P: AsRef<Path>>(paths: &[P], task: &TaskDescriptor) -> Result<RankingOutput> {
    let extractor = LopdfExtractor::new();
    let documents = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let pages = extractor.extract(path)?;
            Ok(RankedDocument::new(pipeline::document_name(path), pages))
        })
        .collect::<Result<Vec<_>>>()?;

    let analyzer = PersonaAnalyzer::new(EmbeddingModels::hashed(rank::DEFAULT_DIMENSIONS));
    analyzer.analyze(&documents, task)
}
