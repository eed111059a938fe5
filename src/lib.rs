//! logsift — Log anomaly scoring pipeline.
//!
//! Modular structure:
//! - [`parser`] — Keyword level classification, timestamp stripping
//! - [`features`] — Structural + TF-IDF feature extraction and scaling
//! - [`forest`] — Seeded isolation-forest ensemble
//! - [`pipeline`] — The batch transform: lines in, results + summary out
//! - [`report`] — Result aggregation and anomaly explanations
//! - [`model`] — Frozen-model bundle persistence
//! - [`storage`] — Append-only SQLite result store
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod forest;
pub mod logging;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use config::AnalyzerConfig;
pub use error::PipelineError;
pub use logging::StructuredLogger;
pub use model::FrozenModel;
pub use parser::{LogLevel, ParsedLogRecord, RawLogLine};
pub use pipeline::{AnomalyPipeline, PipelineRun};
pub use report::{AnomalyLabel, AnomalyResult, RunSummary};
pub use storage::ResultStore;
