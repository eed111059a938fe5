//! Fixed structural features per record. Pattern checks follow an ordered
//! column table; `message_frequency` needs the whole batch.

use crate::parser::{LogLevel, ParsedLogRecord};
use ndarray::Array2;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of structural feature columns.
pub const STRUCTURED_DIM: usize = 10;

/// Column names, in output order.
pub const FEATURE_NAMES: [&str; STRUCTURED_DIM] = [
    "msg_len",
    "has_error",
    "has_warning",
    "has_critical",
    "has_failure",
    "has_exception",
    "is_unauthorized",
    "is_connection_issue",
    "has_number",
    "message_frequency",
];

fn failure_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)fail(ed|ure)?").expect("failure regex"))
}

fn connection_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)connection|network|timeout").expect("connection regex"))
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Count of exact-duplicate messages per message (case-sensitive).
pub fn message_frequencies(records: &[ParsedLogRecord]) -> HashMap<&str, f64> {
    let mut freq: HashMap<&str, f64> = HashMap::new();
    for r in records {
        *freq.entry(r.message.as_str()).or_insert(0.0) += 1.0;
    }
    freq
}

/// One `n x 10` block for the batch, rows in input order.
pub fn extract(records: &[ParsedLogRecord]) -> Array2<f64> {
    let freq = message_frequencies(records);
    let mut m = Array2::zeros((records.len(), STRUCTURED_DIM));
    for (i, r) in records.iter().enumerate() {
        let lower = r.message.to_lowercase();
        let row = [
            r.message_length as f64,
            flag(r.level == LogLevel::Error),
            flag(r.level == LogLevel::Warning),
            flag(r.level == LogLevel::Critical),
            flag(failure_re().is_match(&r.message)),
            flag(lower.contains("exception")),
            flag(lower.contains("unauthorized")),
            flag(connection_re().is_match(&r.message)),
            flag(r.message.chars().any(|c| c.is_ascii_digit())),
            freq[r.message.as_str()],
        ];
        for (j, v) in row.into_iter().enumerate() {
            m[[i, j]] = v;
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_batch, RawLogLine};

    fn batch(texts: &[&str]) -> Vec<ParsedLogRecord> {
        let lines: Vec<RawLogLine> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawLogLine {
                id: i as i64 + 1,
                source_file: "t.log".to_string(),
                raw_text: t.to_string(),
            })
            .collect();
        parse_batch(&lines)
    }

    #[test]
    fn pattern_flags() {
        let records = batch(&["Login FAILED for user 42", "ok"]);
        let m = extract(&records);
        assert_eq!(m.dim(), (2, STRUCTURED_DIM));
        assert_eq!(m[[0, 4]], 1.0); // has_failure, case-insensitive
        assert_eq!(m[[0, 8]], 1.0); // has_number
        assert_eq!(m[[1, 4]], 0.0);
        assert_eq!(m[[1, 8]], 0.0);
    }

    #[test]
    fn failure_variants_match() {
        for text in ["fail", "Failed", "FAILURE", "failing over"] {
            let records = batch(&[text]);
            assert_eq!(extract(&records)[[0, 4]], 1.0, "{text}");
        }
        let records = batch(&["flawless"]);
        assert_eq!(extract(&records)[[0, 4]], 0.0);
    }

    #[test]
    fn connection_issue_keywords() {
        for text in ["Connection reset", "network down", "request TIMEOUT"] {
            let records = batch(&[text]);
            assert_eq!(extract(&records)[[0, 7]], 1.0, "{text}");
        }
    }

    #[test]
    fn level_flags_follow_classification() {
        let records = batch(&["ERROR boom", "WARNING slow", "FATAL oom", "fine"]);
        let m = extract(&records);
        assert_eq!(m[[0, 1]], 1.0);
        assert_eq!(m[[1, 2]], 1.0);
        assert_eq!(m[[2, 3]], 1.0);
        assert_eq!(m[[3, 1]] + m[[3, 2]] + m[[3, 3]], 0.0);
    }

    #[test]
    fn frequency_counts_exact_duplicates() {
        let records = batch(&["same", "same", "other", "Same"]);
        let m = extract(&records);
        assert_eq!(m[[0, 9]], 2.0);
        assert_eq!(m[[1, 9]], 2.0);
        assert_eq!(m[[2, 9]], 1.0);
        // case-sensitive equality
        assert_eq!(m[[3, 9]], 1.0);
        // reciprocal frequencies of a duplicate group sum to 1
        let group_sum: f64 = (0..2).map(|i| 1.0 / m[[i, 9]]).sum();
        assert!((group_sum - 1.0).abs() < 1e-12);
    }
}
