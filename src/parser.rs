//! Log line classification and parsing: keyword rule table for the level,
//! leading-timestamp stripping for the message.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One raw line as handed over by ingestion. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogLine {
    pub id: i64,
    pub source_file: String,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warning,
    Critical,
    Debug,
    Summary,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Critical => "critical",
            LogLevel::Debug => "debug",
            LogLevel::Summary => "summary",
            LogLevel::Info => "info",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(LogLevel::Error),
            "warning" => Some(LogLevel::Warning),
            "critical" => Some(LogLevel::Critical),
            "debug" => Some(LogLevel::Debug),
            "summary" => Some(LogLevel::Summary),
            "info" => Some(LogLevel::Info),
            _ => None,
        }
    }
}

/// Ordered keyword rules, first match wins. Matching is case-sensitive
/// substring containment on the raw line; lines matching nothing are Info.
const LEVEL_RULES: &[(&[&str], LogLevel)] = &[
    (&["ERROR"], LogLevel::Error),
    (&["WARNING", "WARN"], LogLevel::Warning),
    (&["CRITICAL", "FATAL"], LogLevel::Critical),
    (&["DEBUG"], LogLevel::Debug),
    (&["SUMMARY"], LogLevel::Summary),
];

pub fn classify_level(raw: &str) -> LogLevel {
    for (keywords, level) in LEVEL_RULES {
        if keywords.iter().any(|k| raw.contains(k)) {
            return *level;
        }
    }
    LogLevel::Info
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\s*").expect("timestamp regex")
    })
}

/// Strip a single leading `YYYY-MM-DD HH:MM:SS` prefix plus trailing
/// whitespace; lines without the prefix pass through unchanged.
pub fn strip_timestamp(raw: &str) -> &str {
    match timestamp_re().find(raw) {
        Some(m) => &raw[m.end()..],
        None => raw,
    }
}

/// Normalized record derived once per raw line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLogRecord {
    pub id: i64,
    pub source_file: String,
    pub level: LogLevel,
    pub message: String,
    pub message_length: usize,
}

impl ParsedLogRecord {
    pub fn from_raw(raw: &RawLogLine) -> Self {
        let level = classify_level(&raw.raw_text);
        let message = strip_timestamp(&raw.raw_text).to_string();
        let message_length = message.chars().count();
        Self {
            id: raw.id,
            source_file: raw.source_file.clone(),
            level,
            message,
            message_length,
        }
    }
}

/// Parse a batch: exactly one record per input line, order and ids preserved.
/// Empty lines come out as Info with an empty message.
pub fn parse_batch(lines: &[RawLogLine]) -> Vec<ParsedLogRecord> {
    lines.iter().map(ParsedLogRecord::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> RawLogLine {
        RawLogLine {
            id: 1,
            source_file: "app.log".to_string(),
            raw_text: text.to_string(),
        }
    }

    #[test]
    fn level_priority_order() {
        // ERROR outranks everything else, including CRITICAL
        assert_eq!(classify_level("ERROR and WARNING"), LogLevel::Error);
        assert_eq!(classify_level("CRITICAL ERROR"), LogLevel::Error);
        assert_eq!(classify_level("WARN: disk"), LogLevel::Warning);
        assert_eq!(classify_level("FATAL: oom"), LogLevel::Critical);
        assert_eq!(classify_level("DEBUG trace"), LogLevel::Debug);
        assert_eq!(classify_level("SUMMARY of run"), LogLevel::Summary);
        assert_eq!(classify_level("plain line"), LogLevel::Info);
        // case-sensitive: lowercase keywords do not match
        assert_eq!(classify_level("error lowercase"), LogLevel::Info);
    }

    #[test]
    fn timestamp_strip_and_idempotence() {
        let line = "2025-03-27 10:00:36 ERROR Connection refused";
        let once = strip_timestamp(line);
        assert_eq!(once, "ERROR Connection refused");
        assert_eq!(strip_timestamp(once), once);
        assert_eq!(strip_timestamp("no timestamp here"), "no timestamp here");
    }

    #[test]
    fn empty_line_parses_to_info() {
        let rec = ParsedLogRecord::from_raw(&raw(""));
        assert_eq!(rec.level, LogLevel::Info);
        assert_eq!(rec.message, "");
        assert_eq!(rec.message_length, 0);
    }

    #[test]
    fn message_length_counts_chars() {
        let rec = ParsedLogRecord::from_raw(&raw("2025-01-01 00:00:00 héllo"));
        assert_eq!(rec.message, "héllo");
        assert_eq!(rec.message_length, 5);
    }
}
