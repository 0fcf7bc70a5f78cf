//! Benchmarks for outline building and section ranking.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic so the numbers only depend on the pipeline itself.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagesift::rank::{keyword_score, SectionSegmenter};
use pagesift::text::word_tokens;
use pagesift::{
    EmbeddingModels, OutlineBuilder, PageContent, PersonaAnalyzer, RankedDocument, WordRun,
};

const SENTENCES: &[&str] = &[
    "Quarterly revenue grew across every region despite rising material costs.",
    "The travel budget covers flights, hotels and meals for the whole team.",
    "Risk assessments are reviewed by the board at the end of each quarter.",
    "Local restaurants offer seasonal menus built around regional produce.",
    "Staff training focuses on safety procedures and customer communication.",
];

/// Pages of alternating labels and prose.
fn synthetic_pages(page_count: u32) -> Vec<PageContent> {
    (1..=page_count)
        .map(|number| {
            let mut text = String::new();
            let mut words = Vec::new();
            let mut top = 50.0;

            for (idx, sentence) in SENTENCES.iter().enumerate() {
                let label = format!("SECTION {}", idx + 1);
                for word in label.split(' ') {
                    words.push(WordRun::new(word, top, 16.0, number).bold());
                }
                top += 24.0;
                for word in sentence.split(' ') {
                    words.push(WordRun::new(word, top, 10.0, number));
                }
                top += 14.0;

                text.push_str(&format!("{}\n\n{} {}\n\n", label, sentence, sentence));
            }
            PageContent::new(number, words, text)
        })
        .collect()
}

fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline");
    let builder = OutlineBuilder::new();

    for page_count in [1u32, 10, 50].iter() {
        let pages = synthetic_pages(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| builder.build(black_box(&pages)));
        });
    }

    group.finish();
}

fn bench_segmentation(c: &mut Criterion) {
    let segmenter = SectionSegmenter::new();
    let pages = synthetic_pages(10);

    c.bench_function("segment_10_pages", |b| {
        b.iter(|| segmenter.segment_document(black_box(&pages), "bench.pdf"));
    });
}

fn bench_keyword_score(c: &mut Criterion) {
    let tokens = word_tokens("plan a budget trip with regional restaurants");

    c.bench_function("keyword_score", |b| {
        b.iter(|| keyword_score(black_box(&tokens), black_box(SENTENCES[1])));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    let analyzer = PersonaAnalyzer::new(EmbeddingModels::hashed(384));
    let job = "Plan a budget trip with good regional restaurants";

    for doc_count in [1usize, 5].iter() {
        let documents: Vec<RankedDocument> = (0..*doc_count)
            .map(|i| RankedDocument::new(format!("doc{}.pdf", i), synthetic_pages(5)))
            .collect();

        group.bench_function(format!("{}_documents", doc_count), |b| {
            b.iter(|| analyzer.rank(black_box(&documents), job).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_outline,
    bench_segmentation,
    bench_keyword_score,
    bench_ranking,
);
criterion_main!(benches);
