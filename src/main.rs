//! logsift entrypoint: scan a log directory into an ordered batch, score it,
//! persist results. Runs once or as a daemon loop with a configurable rescan
//! interval.

use logsift::{
    config::{AnalyzerConfig, IngestConfig},
    logging::{AuditLog, StructuredLogger},
    model::FrozenModel,
    pipeline::AnomalyPipeline,
    report::explain::{explain, BatchStats},
    report::AnomalyLabel,
    storage::ResultStore,
    AnomalyResult, RawLogLine,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Ingestion collaborator: read matching files under the log directory into
/// one ordered batch with sequential ids. Files are visited in sorted path
/// order so ids are stable across runs.
fn load_batch(config: &IngestConfig) -> std::io::Result<Vec<RawLogLine>> {
    let mut files: Vec<PathBuf> = WalkDir::new(&config.log_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|x| x.to_str())
                .map(|x| config.extensions.iter().any(|e| e == x))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut lines = Vec::new();
    let mut next_id: i64 = 1;
    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if let Some(filter) = &config.source_file {
            if &name != filter {
                continue;
            }
        }
        let text = std::fs::read_to_string(&path)?;
        for line in text.lines() {
            lines.push(RawLogLine {
                id: next_id,
                source_file: name.clone(),
                raw_text: line.to_string(),
            });
            next_id += 1;
        }
    }
    Ok(lines)
}

fn load_frozen(config: &AnalyzerConfig) -> Option<FrozenModel> {
    if !config.model.reuse {
        return None;
    }
    let path = config.model.path.as_ref()?;
    match FrozenModel::load(path) {
        Ok(m) => {
            info!(path = %path.display(), "frozen model loaded");
            Some(m)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "frozen model unavailable; fitting fresh");
            None
        }
    }
}

fn run_one_cycle(
    config: &AnalyzerConfig,
    pipeline: &AnomalyPipeline,
    store: &ResultStore,
    audit: &AuditLog,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let batch = load_batch(&config.ingest)?;
    info!(lines = batch.len(), "loaded log batch");
    let filter = config.ingest.source_file.as_deref();

    let frozen = load_frozen(config);
    let run = match &frozen {
        Some(m) => pipeline.run_frozen(m, &batch, filter)?,
        None => pipeline.run(&batch, filter)?,
    };

    // Persist; a store failure keeps the in-memory results and is not retried.
    let persisted = store
        .append_results(&run.summary.run_id, &run.results)
        .and_then(|_| store.append_summary(&run.summary));
    if let Err(e) = persisted {
        warn!(error = %e, "result persistence failed; results kept in memory only");
    }
    if let Err(e) = audit.append(&run.summary) {
        warn!(error = %e, "audit append failed");
    }

    if let (Some(path), Some(model)) = (&config.model.path, &run.model) {
        match model.save(path) {
            Ok(()) => info!(path = %path.display(), "frozen model saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "frozen model save failed"),
        }
    }

    let stats = BatchStats::from_results(&run.results);
    let mut flagged: Vec<&AnomalyResult> = run
        .results
        .iter()
        .filter(|r| r.label == AnomalyLabel::Anomaly)
        .collect();
    flagged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    for r in flagged.iter().take(5) {
        let reasons = explain(r, &stats);
        info!(
            id = r.id,
            source = %r.source_file,
            score = r.score,
            reasons = %reasons.join("; "),
            "anomaly"
        );
    }

    info!(
        run_id = %run.summary.run_id,
        total = run.summary.total_records,
        anomalies = run.summary.anomalies_detected,
        contamination = run.summary.contamination,
        "run complete"
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("LOGSIFT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = AnalyzerConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(data_dir = ?config.data_dir, log_dir = ?config.ingest.log_dir, "logsift starting");

    std::fs::create_dir_all(&config.data_dir)?;
    let store = ResultStore::open(&config.data_dir.join("results.db"))?;
    let audit = AuditLog::new(&config.data_dir.join("runs.ndjson"));
    let pipeline = AnomalyPipeline::new(config.vectorizer.clone(), config.forest.clone())?;

    let interval_secs = config.ingest.scan_interval_secs;
    if interval_secs > 0 {
        info!(interval_secs, "daemon mode (Ctrl+C to stop)");
        static STOP: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        let _ = ctrlc::set_handler(|| {
            STOP.store(true, std::sync::atomic::Ordering::Relaxed);
        });
        let mut cycle: u64 = 0;
        while !STOP.load(std::sync::atomic::Ordering::Relaxed) {
            cycle += 1;
            if let Err(e) = run_one_cycle(&config, &pipeline, &store, &audit) {
                warn!(cycle, error = %e, "cycle failed");
            }
            for _ in 0..(interval_secs as u32) {
                if STOP.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        info!("logsift stopping");
    } else {
        run_one_cycle(&config, &pipeline, &store, &audit)?;
        info!("logsift run complete");
    }

    Ok(())
}
