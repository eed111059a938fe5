//! Per-record anomaly results and the per-run summary, joined back onto the
//! originating records in input order.

pub mod explain;

use crate::parser::{LogLevel, ParsedLogRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
}

impl AnomalyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::Normal => "normal",
            AnomalyLabel::Anomaly => "anomaly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(AnomalyLabel::Normal),
            "anomaly" => Some(AnomalyLabel::Anomaly),
            _ => None,
        }
    }
}

/// Scored record. Appended to the result log, never overwritten; the same
/// line may appear under several run ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub id: i64,
    pub source_file: String,
    pub level: LogLevel,
    pub message: String,
    pub label: AnomalyLabel,
    /// Raw isolation score in [0, 1]: anomaly strength, not a calibrated
    /// probability.
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub source_file_filter: Option<String>,
    pub total_records: usize,
    pub anomalies_detected: usize,
    pub contamination: f64,
    pub ts: DateTime<Utc>,
}

/// Join scores back onto records, preserving input order and count. Rows at
/// or above the threshold are anomalies; with no threshold every row is
/// normal.
pub fn build_results(
    records: &[ParsedLogRecord],
    scores: &[f64],
    threshold: Option<f64>,
) -> Vec<AnomalyResult> {
    records
        .iter()
        .zip(scores)
        .map(|(r, &score)| AnomalyResult {
            id: r.id,
            source_file: r.source_file.clone(),
            level: r.level,
            message: r.message.clone(),
            label: match threshold {
                Some(t) if score >= t => AnomalyLabel::Anomaly,
                _ => AnomalyLabel::Normal,
            },
            score,
        })
        .collect()
}

pub fn summarize(
    results: &[AnomalyResult],
    contamination: f64,
    source_file_filter: Option<&str>,
) -> RunSummary {
    RunSummary {
        run_id: Uuid::new_v4(),
        source_file_filter: source_file_filter.map(str::to_string),
        total_records: results.len(),
        anomalies_detected: results
            .iter()
            .filter(|r| r.label == AnomalyLabel::Anomaly)
            .count(),
        contamination,
        ts: Utc::now(),
    }
}
