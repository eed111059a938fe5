//! Pipeline benchmark: raw lines → parse → structural features → TF-IDF.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use logsift::config::VectorizerConfig;
use logsift::features::{structured, TfidfVocabulary};
use logsift::parser::{self, RawLogLine};

fn make_dummy_lines(n: usize) -> Vec<RawLogLine> {
    (0..n)
        .map(|i| RawLogLine {
            id: i as i64 + 1,
            source_file: "bench.log".to_string(),
            raw_text: format!(
                "2025-03-27 10:00:{:02} INFO worker {} finished request in {} ms",
                i % 60,
                i % 8,
                i * 3
            ),
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let batch = make_dummy_lines(500);
    c.bench_function("parse_500_lines", |b| {
        b.iter(|| black_box(parser::parse_batch(black_box(&batch))))
    });
}

fn bench_structured_features(c: &mut Criterion) {
    let records = parser::parse_batch(&make_dummy_lines(500));
    c.bench_function("structured_features_500", |b| {
        b.iter(|| black_box(structured::extract(black_box(&records))))
    });
}

fn bench_tfidf(c: &mut Criterion) {
    let records = parser::parse_batch(&make_dummy_lines(500));
    let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    let config = VectorizerConfig::default();
    c.bench_function("tfidf_fit_transform_500", |b| {
        b.iter(|| {
            let vocab = TfidfVocabulary::fit(black_box(&messages), &config);
            black_box(vocab.transform(&messages))
        })
    });
}

criterion_group!(benches, bench_parse, bench_structured_features, bench_tfidf);
criterion_main!(benches);
