//! Human-readable reasons for flagged lines: severity, keyword hits, rarity,
//! length deviation. Diagnostic only; never feeds scoring.

use super::AnomalyResult;
use crate::parser::LogLevel;
use std::collections::HashMap;

/// Keyword table scanned against the lower-cased message.
const KEYWORD_REASONS: &[(&str, &str)] = &[
    ("fail", "contains failure indicators"),
    ("exception", "exception detected"),
    ("unauthorized", "unauthorized access attempt"),
    ("timeout", "timeout issue"),
    ("connection", "connection problem"),
    ("denied", "access denied"),
    ("attack", "potential security threat"),
    ("locked", "account locking event"),
    ("breach", "security breach indicator"),
    ("malicious", "malicious activity"),
];

/// Batch statistics a single result is judged against.
#[derive(Debug, Clone)]
pub struct BatchStats {
    total: usize,
    mean_len: f64,
    std_len: f64,
    freq: HashMap<String, usize>,
}

impl BatchStats {
    pub fn from_results(results: &[AnomalyResult]) -> Self {
        let total = results.len();
        let mut freq: HashMap<String, usize> = HashMap::new();
        for r in results {
            *freq.entry(r.message.clone()).or_insert(0) += 1;
        }
        let lens: Vec<f64> = results
            .iter()
            .map(|r| r.message.chars().count() as f64)
            .collect();
        let n = lens.len().max(1) as f64;
        let mean_len = lens.iter().sum::<f64>() / n;
        let std_len =
            (lens.iter().map(|l| (l - mean_len) * (l - mean_len)).sum::<f64>() / n).sqrt();
        Self {
            total,
            mean_len,
            std_len,
            freq,
        }
    }
}

/// Reasons a line stands out from its batch. Empty for thoroughly ordinary
/// lines.
pub fn explain(result: &AnomalyResult, stats: &BatchStats) -> Vec<String> {
    let mut reasons = Vec::new();

    if matches!(result.level, LogLevel::Error | LogLevel::Critical) {
        reasons.push(format!("high severity level: {}", result.level.as_str()));
    }

    let lower = result.message.to_lowercase();
    for (keyword, why) in KEYWORD_REASONS {
        if lower.contains(keyword) {
            reasons.push((*why).to_string());
        }
    }

    if stats.total > 0 {
        let count = stats.freq.get(&result.message).copied().unwrap_or(0);
        let pct = 100.0 * count as f64 / stats.total as f64;
        if pct < 1.0 {
            reasons.push(format!(
                "extremely rare message ({count} of {} lines)",
                stats.total
            ));
        } else if pct < 5.0 {
            reasons.push(format!(
                "uncommon message ({count} of {} lines)",
                stats.total
            ));
        }
    }

    if stats.std_len > 0.0 {
        let len = result.message.chars().count() as f64;
        if len > stats.mean_len + 2.0 * stats.std_len {
            reasons.push(format!(
                "unusually long message ({} chars vs {:.0} avg)",
                len as usize, stats.mean_len
            ));
        } else if len < stats.mean_len - 2.0 * stats.std_len {
            reasons.push(format!(
                "unusually short message ({} chars vs {:.0} avg)",
                len as usize, stats.mean_len
            ));
        }
    }

    reasons
}
