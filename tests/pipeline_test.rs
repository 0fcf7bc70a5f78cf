//! End-to-end tests: real PDF files through extraction and both pipelines.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pagesift::pipeline::{self, PERSONA_OUTPUT_FILE};
use pagesift::{
    EmbeddingModels, Error, ExtractOptions, LayoutExtractor, LopdfExtractor, OutlineBuilder,
    PersonaAnalyzer, PipelineOptions,
};

/// A text run: font resource (`F1` regular, `F2` bold), size, x, y, text.
type Run<'a> = (&'a str, i64, i64, i64, &'a str);

fn build_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for (font, size, x, y, text) in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![(*font).into(), (*size).into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn report_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![
            ("F2", 24, 72, 720, "Annual Report 2024"),
            ("F2", 14, 72, 680, "1 Introduction"),
            ("F1", 10, 72, 660, "The annual budget covers all regional operations this year."),
            ("F1", 10, 72, 648, "Rising material costs create a significant risk for the plan."),
            ("F1", 10, 72, 636, "Management will review spending targets every single quarter."),
        ],
        vec![
            ("F2", 12, 72, 720, "2 Results"),
            ("F1", 10, 72, 700, "Revenue grew in every region despite higher travel costs."),
            ("F1", 10, 72, 688, "Hotel and restaurant spending stayed within the approved limits."),
        ],
    ])
}

fn write(dir: &Path, name: &str, data: &[u8]) {
    fs::write(dir.join(name), data).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_extract_real_pdf() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "report.pdf", &report_pdf());

    let pages = LopdfExtractor::new().extract(&dir.path().join("report.pdf")).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert!(pages[0].text.starts_with("Annual Report 2024\n\n1 Introduction\n\n"));
    assert!(pages[0].words.iter().take(3).all(|w| w.is_bold));
    assert_eq!(pages[1].words[0].text, "2");
}

#[test]
fn test_outline_pipeline_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "report.pdf", &report_pdf());
    write(input.path(), "notes.txt", b"ignored");

    let written = pipeline::build_outlines(
        input.path(),
        output.path(),
        &LopdfExtractor::new(),
        &OutlineBuilder::new(),
        &PipelineOptions::default(),
    )
    .unwrap();
    assert_eq!(written, vec![output.path().join("report.json")]);

    let json = read_json(&written[0]);
    assert_eq!(json["title"], "Annual Report 2024");
    assert_eq!(json["outline"][0]["level"], "H1");
    assert_eq!(json["outline"][0]["text"], "Annual Report 2024");
    assert_eq!(json["outline"][1]["text"], "Introduction");
    assert_eq!(json["outline"][1]["page"], 1);

    let last = json["outline"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["text"], "Results");
    assert_eq!(last["page"], 2);
}

#[test]
fn test_outline_follows_reading_order() {
    // drawn bottom-up: the lower heading comes first in the stream
    let data = build_pdf(&[vec![
        ("F2", 14, 72, 600, "Second Heading"),
        ("F1", 10, 72, 650, "Body between headings."),
        ("F2", 14, 72, 700, "First Heading"),
    ]]);

    let outline = pagesift::outline_bytes(&data).unwrap();
    assert_eq!(outline.title, "First Heading");
    let texts: Vec<_> = outline.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["First Heading", "Second Heading"]);
}

#[test]
fn test_rank_pipeline_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "b_report.pdf", &report_pdf());
    write(
        input.path(),
        "a_travel.PDF",
        &build_pdf(&[vec![
            ("F2", 16, 72, 720, "TRAVEL TIPS"),
            ("F1", 10, 72, 690, "Book hotels early to keep the travel budget under control."),
        ]]),
    );
    let task = input.path().join("task.json");
    fs::write(
        &task,
        r#"{"persona": "Finance analyst", "job_to_be_done": "Assess budget risks and costs"}"#,
    )
    .unwrap();

    let out_dir = output.path().join("nested");
    let path = pipeline::run_persona_analysis(
        input.path(),
        &task,
        &out_dir,
        &LopdfExtractor::new(),
        &PersonaAnalyzer::new(EmbeddingModels::hashed(256)),
        &PipelineOptions::new().sequential(),
    )
    .unwrap();

    assert_eq!(path, out_dir.join(PERSONA_OUTPUT_FILE));
    let json = read_json(&path);
    assert_eq!(
        json["metadata"]["input_documents"],
        serde_json::json!(["a_travel.PDF", "b_report.pdf"])
    );
    assert_eq!(json["metadata"]["persona"], "Finance analyst");

    let sections = json["extracted_sections"].as_array().unwrap();
    assert!(!sections.is_empty() && sections.len() <= 20);
    assert_eq!(sections[0]["importance_rank"], 1);
    assert!(json["sub_section_analysis"].as_array().unwrap().len() <= 10);
}

#[test]
fn test_rank_pipeline_without_pdfs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "readme.txt", b"no pdfs here");
    let task = input.path().join("task.json");
    fs::write(&task, r#"{"persona": "p", "job_to_be_done": "j"}"#).unwrap();

    let result = pipeline::run_persona_analysis(
        input.path(),
        &task,
        output.path(),
        &LopdfExtractor::new(),
        &PersonaAnalyzer::new(EmbeddingModels::hashed(32)),
        &PipelineOptions::default(),
    );
    assert!(matches!(result, Err(Error::NoDocuments(_))));
    assert!(!output.path().join(PERSONA_OUTPUT_FILE).exists());
}

#[test]
fn test_lenient_rank_with_only_broken_pdfs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "broken.pdf", b"this is not a pdf at all");
    let task = input.path().join("task.json");
    fs::write(&task, r#"{"persona": "p", "job_to_be_done": "j"}"#).unwrap();

    let result = pipeline::run_persona_analysis(
        input.path(),
        &task,
        output.path(),
        &LopdfExtractor::with_options(ExtractOptions::new().lenient()),
        &PersonaAnalyzer::new(EmbeddingModels::hashed(32)),
        &PipelineOptions::default().lenient(),
    );
    assert!(matches!(result, Err(Error::NoDocuments(_))));
    assert!(!output.path().join(PERSONA_OUTPUT_FILE).exists());
}

#[test]
fn test_broken_pdf_strict_and_lenient() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "good.pdf", &report_pdf());
    write(input.path(), "broken.pdf", b"this is not a pdf at all");

    let strict = pipeline::build_outlines(
        input.path(),
        output.path(),
        &LopdfExtractor::new(),
        &OutlineBuilder::new(),
        &PipelineOptions::default(),
    );
    assert!(strict.is_err());

    let extractor = LopdfExtractor::with_options(ExtractOptions::new().lenient());
    let written = pipeline::build_outlines(
        input.path(),
        output.path(),
        &extractor,
        &OutlineBuilder::new(),
        &PipelineOptions::default().lenient(),
    )
    .unwrap();
    assert_eq!(written, vec![output.path().join("good.json")]);
}

#[test]
fn test_compact_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "report.pdf", &report_pdf());

    let written = pipeline::build_outlines(
        input.path(),
        output.path(),
        &LopdfExtractor::new(),
        &OutlineBuilder::new(),
        &PipelineOptions::new().compact(),
    )
    .unwrap();
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(!text.contains('\n'));
}
