//! pagesift CLI - document outlines and persona-driven section ranking

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagesift::pipeline::{self, ExtractedDocument};
use pagesift::rank::DEFAULT_DIMENSIONS;
use pagesift::{
    EmbeddingModels, ExtractOptions, HashEmbedder, LopdfExtractor, OutlineBuilder,
    OutlineOptions, PersonaAnalyzer, PipelineOptions, RankOptions, TaskDescriptor,
};

#[derive(Parser)]
#[command(name = "pagesift")]
#[command(version)]
#[command(about = "Build PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title and heading outline for every PDF in a directory
    Outline {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Treat unreadable pages as empty and skip unreadable documents
        #[arg(long)]
        lenient: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Size ratio over the page average for H1
        #[arg(long, value_name = "R", default_value_t = pagesift::outline::DEFAULT_H1_RATIO)]
        h1_ratio: f32,

        /// Size ratio over the page average for H2
        #[arg(long, value_name = "R", default_value_t = pagesift::outline::DEFAULT_H2_RATIO)]
        h2_ratio: f32,

        /// Size ratio over the page average for H3
        #[arg(long, value_name = "R", default_value_t = pagesift::outline::DEFAULT_H3_RATIO)]
        h3_ratio: f32,
    },

    /// Rank sections of every PDF in a directory against a task
    Rank {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Task descriptor JSON with "persona" and "job_to_be_done"
        #[arg(short, long, value_name = "FILE", env = "PAGESIFT_TASK")]
        task: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Treat unreadable pages as empty and skip unreadable documents
        #[arg(long)]
        lenient: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Embedding dimensions
        #[arg(long, value_name = "N", default_value_t = DEFAULT_DIMENSIONS)]
        dimensions: usize,

        /// Embed all text with the primary model
        #[arg(long)]
        monolingual: bool,

        /// Number of ranked sections to report
        #[arg(long, value_name = "N", default_value_t = 20)]
        top: usize,

        /// Number of refined sub-sections to report
        #[arg(long, value_name = "N", default_value_t = 10)]
        sub_top: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            lenient,
            compact,
            h1_ratio,
            h2_ratio,
            h3_ratio,
        } => {
            let options = OutlineOptions::new()
                .with_h1_ratio(h1_ratio)
                .with_h2_ratio(h2_ratio)
                .with_h3_ratio(h3_ratio);
            log::debug!("outline options: {:?}", options);
            cmd_outline(&input, &output, options, pipeline_options(lenient, compact))
        }
        Commands::Rank {
            input,
            task,
            output,
            lenient,
            compact,
            dimensions,
            monolingual,
            top,
            sub_top,
        } => {
            let options = RankOptions::new()
                .with_top_sections(top)
                .with_top_sub_sections(sub_top);
            log::debug!("rank options: {:?}", options);
            cmd_rank(
                &input,
                &task,
                &output,
                embedding_models(dimensions, monolingual),
                options,
                pipeline_options(lenient, compact),
            )
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn pipeline_options(lenient: bool, compact: bool) -> PipelineOptions {
    let mut options = PipelineOptions::new();
    if lenient {
        options = options.lenient();
    }
    if compact {
        options = options.compact();
    }
    options
}

fn embedding_models(dimensions: usize, monolingual: bool) -> EmbeddingModels {
    if monolingual {
        EmbeddingModels::new(Arc::new(HashEmbedder::primary(dimensions)))
    } else {
        EmbeddingModels::hashed(dimensions)
    }
}

fn extractor(options: &PipelineOptions) -> LopdfExtractor {
    let mut extract_options = ExtractOptions::new();
    if options.error_mode == pagesift::ErrorMode::Lenient {
        extract_options = extract_options.lenient();
    }
    LopdfExtractor::with_options(extract_options)
}

/// Discover and extract with a progress bar.
fn extract_with_progress(
    input: &Path,
    options: &PipelineOptions,
) -> Result<Vec<ExtractedDocument>, Box<dyn std::error::Error>> {
    let paths = pipeline::discover_documents(input)?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Extracting...");

    let documents = pipeline::extract_documents(&paths, &extractor(options), options, |path| {
        pb.set_message(pipeline::document_name(path));
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    if documents.len() < paths.len() {
        println!(
            "{} {} of {} documents skipped",
            "Warning:".yellow().bold(),
            paths.len() - documents.len(),
            paths.len()
        );
    }
    Ok(documents)
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    outline_options: OutlineOptions,
    options: PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = extract_with_progress(input, &options)?;
    if documents.is_empty() {
        println!("{} {}", "No PDF documents in".yellow(), input.display());
        return Ok(());
    }

    let builder = OutlineBuilder::with_options(outline_options);
    let written = pipeline::write_outlines(&documents, &builder, output, options.format)?;

    println!("\n{}", "Output files:".green().bold());
    for (idx, path) in written.iter().enumerate() {
        let branch = if idx + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    Ok(())
}

fn cmd_rank(
    input: &Path,
    task_file: &Path,
    output: &Path,
    models: EmbeddingModels,
    rank_options: RankOptions,
    options: PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = TaskDescriptor::from_file(task_file)?;
    let documents = extract_with_progress(input, &options)?;

    let analyzer = PersonaAnalyzer::with_options(models, rank_options);
    let (result, written) =
        pipeline::rank_and_write(input, &documents, &analyzer, &task, output, options.format)?;

    println!("\n{}", "Top sections:".green().bold());
    for section in result.extracted_sections.iter().take(5) {
        println!(
            "  {:>2}. {} {} (p. {})",
            section.importance_rank,
            section.section_title,
            format!("[{}]", section.document).dimmed(),
            section.page_number
        );
    }
    println!("\n{} {}", "Output:".green().bold(), written.display());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagesift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outlines and persona-driven section ranking");
    println!();
    println!("License: MIT");
}
