//! Result store benchmark: append one run's rows, read them back.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use logsift::parser::LogLevel;
use logsift::report::{AnomalyLabel, AnomalyResult};
use logsift::storage::ResultStore;
use tempfile::tempdir;
use uuid::Uuid;

fn make_results(n: usize) -> Vec<AnomalyResult> {
    (0..n)
        .map(|i| AnomalyResult {
            id: i as i64 + 1,
            source_file: "bench.log".to_string(),
            level: LogLevel::Info,
            message: format!("worker {} finished", i),
            label: AnomalyLabel::Normal,
            score: 0.42,
        })
        .collect()
}

fn bench_append_results(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ResultStore::open(&dir.path().join("results.db")).unwrap();
    let results = make_results(100);

    c.bench_function("storage_append_100_results", |b| {
        b.iter(|| {
            let run_id = Uuid::new_v4();
            black_box(store.append_results(&run_id, black_box(&results))).unwrap()
        })
    });
}

fn bench_read_run(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ResultStore::open(&dir.path().join("results.db")).unwrap();
    let results = make_results(100);
    let run_id = Uuid::new_v4();
    store.append_results(&run_id, &results).unwrap();

    c.bench_function("storage_read_run", |b| {
        b.iter(|| black_box(store.results_for_run(&run_id)).unwrap())
    });
}

criterion_group!(benches, bench_append_results, bench_read_run);
criterion_main!(benches);
