//! Directory-level runs: discover documents, extract, build, write JSON.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::extract::{ErrorMode, LayoutExtractor};
use crate::model::{Outline, PageContent, RankingOutput, TaskDescriptor};
use crate::outline::OutlineBuilder;
use crate::rank::{PersonaAnalyzer, RankedDocument};
use crate::render::{write_json, JsonFormat};

/// File name of the ranker's output.
pub const PERSONA_OUTPUT_FILE: &str = "persona_analysis_output.json";

/// Options for directory runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Extract documents on the rayon pool
    pub parallel: bool,

    /// JSON layout of written files
    pub format: JsonFormat,

    /// Whether a document that fails to extract stops the run
    pub error_mode: ErrorMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            format: JsonFormat::Pretty,
            error_mode: ErrorMode::Strict,
        }
    }
}

impl PipelineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Write compact JSON.
    pub fn compact(mut self) -> Self {
        self.format = JsonFormat::Compact;
        self
    }

    /// Log and skip documents that fail to extract.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// A document after extraction.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Source path
    pub path: PathBuf,
    /// Extracted pages
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Base file name of the source, e.g. `report.pdf`.
    pub fn name(&self) -> String {
        document_name(&self.path)
    }
}

/// Base file name of a path.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Output file name for a document's outline: `<stem>.json`.
pub fn outline_file_name(path: &Path) -> String {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    format!("{}.json", stem)
}

/// PDF files directly inside `dir`, sorted by file name.
///
/// The extension match is case-insensitive. Subdirectories are not searched.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("{} documents in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Extract every document, keeping input order.
///
/// `on_document` is called once per document as soon as it finishes, from
/// whichever thread extracted it. In lenient mode failing documents are
/// logged and left out; otherwise the first failure in input order is
/// returned.
pub fn extract_documents<E, F>(
    paths: &[PathBuf],
    extractor: &E,
    options: &PipelineOptions,
    on_document: F,
) -> Result<Vec<ExtractedDocument>>
where
    E: LayoutExtractor + ?Sized,
    F: Fn(&Path) + Sync,
{
    let extract_one = |path: &PathBuf| {
        log::debug!("extracting {}", path.display());
        let result = extractor.extract(path);
        on_document(path.as_path());
        result
    };

    let results: Vec<Result<Vec<PageContent>>> = if options.parallel {
        paths.par_iter().map(extract_one).collect()
    } else {
        paths.iter().map(extract_one).collect()
    };

    let mut documents = Vec::with_capacity(paths.len());
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(pages) => documents.push(ExtractedDocument {
                path: path.clone(),
                pages,
            }),
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(documents)
}

/// Build and write one outline per document as `<stem>.json` in
/// `output_dir`. Returns the written paths.
pub fn write_outlines(
    documents: &[ExtractedDocument],
    builder: &OutlineBuilder,
    output_dir: &Path,
    format: JsonFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(documents.len());
    for doc in documents {
        let outline: Outline = builder.build(&doc.pages);
        let out_path = output_dir.join(outline_file_name(&doc.path));
        write_json(&out_path, &outline, format)?;
        log::info!(
            "{}: {} headings -> {}",
            doc.name(),
            outline.len(),
            out_path.display()
        );
        written.push(out_path);
    }
    Ok(written)
}

/// Outline every PDF in `input_dir`. An empty directory writes nothing.
pub fn build_outlines<E>(
    input_dir: &Path,
    output_dir: &Path,
    extractor: &E,
    builder: &OutlineBuilder,
    options: &PipelineOptions,
) -> Result<Vec<PathBuf>>
where
    E: LayoutExtractor + ?Sized,
{
    let paths = discover_documents(input_dir)?;
    if paths.is_empty() {
        log::warn!("no PDF documents in {}", input_dir.display());
    }
    let documents = extract_documents(&paths, extractor, options, |_| {})?;
    write_outlines(&documents, builder, output_dir, options.format)
}

/// Rank sections of all documents for a task.
pub fn analyze_documents(
    documents: &[ExtractedDocument],
    analyzer: &PersonaAnalyzer,
    task: &TaskDescriptor,
) -> Result<RankingOutput> {
    let ranked: Vec<RankedDocument> = documents
        .iter()
        .map(|doc| RankedDocument::new(doc.name(), doc.pages.clone()))
        .collect();
    analyzer.analyze(&ranked, task)
}

/// Rank the documents extracted from `input_dir` and write
/// [`PERSONA_OUTPUT_FILE`] to `output_dir`.
///
/// Fails with [`Error::NoDocuments`] before writing anything when no
/// document survived extraction.
pub fn rank_and_write(
    input_dir: &Path,
    documents: &[ExtractedDocument],
    analyzer: &PersonaAnalyzer,
    task: &TaskDescriptor,
    output_dir: &Path,
    format: JsonFormat,
) -> Result<(RankingOutput, PathBuf)> {
    if documents.is_empty() {
        return Err(Error::NoDocuments(input_dir.to_path_buf()));
    }
    let output = analyze_documents(documents, analyzer, task)?;
    let path = write_persona_output(&output, output_dir, format)?;
    Ok((output, path))
}

/// Run the persona analysis over every PDF in `input_dir` and write
/// [`PERSONA_OUTPUT_FILE`] to `output_dir`. Returns the written path.
///
/// Fails with [`Error::NoDocuments`] before writing anything when the
/// directory holds no PDF files or, in lenient mode, when every one of
/// them failed to extract.
pub fn run_persona_analysis<E>(
    input_dir: &Path,
    task_file: &Path,
    output_dir: &Path,
    extractor: &E,
    analyzer: &PersonaAnalyzer,
    options: &PipelineOptions,
) -> Result<PathBuf>
where
    E: LayoutExtractor + ?Sized,
{
    let task = TaskDescriptor::from_file(task_file)?;
    let paths = discover_documents(input_dir)?;
    if paths.is_empty() {
        return Err(Error::NoDocuments(input_dir.to_path_buf()));
    }

    let documents = extract_documents(&paths, extractor, options, |_| {})?;
    let (_, path) = rank_and_write(
        input_dir,
        &documents,
        analyzer,
        &task,
        output_dir,
        options.format,
    )?;
    Ok(path)
}

/// Write a ranking to `output_dir`/[`PERSONA_OUTPUT_FILE`].
pub fn write_persona_output(
    output: &RankingOutput,
    output_dir: &Path,
    format: JsonFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let out_path = output_dir.join(PERSONA_OUTPUT_FILE);
    write_json(&out_path, output, format)?;
    log::info!(
        "{} sections ranked -> {}",
        output.extracted_sections.len(),
        out_path.display()
    );
    Ok(out_path)
}
