//! Analyzer configuration: ingestion, vectorizer, ensemble, model reuse, logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Data directory (result store, frozen model cache)
    pub data_dir: PathBuf,
    /// Log directory scan parameters
    pub ingest: IngestConfig,
    /// TF-IDF vectorizer parameters
    pub vectorizer: VectorizerConfig,
    /// Isolation-forest ensemble parameters
    pub forest: ForestConfig,
    /// Frozen-model persistence
    pub model: ModelConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned for log files
    pub log_dir: PathBuf,
    /// File extensions treated as log files
    pub extensions: Vec<String>,
    /// Restrict the batch to a single file name (None = all files)
    pub source_file: Option<String>,
    /// Rescan interval in seconds; 0 = single run
    pub scan_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Upper bound on vocabulary size
    pub max_features: usize,
    /// Terms in fewer documents than this are dropped
    pub min_df: usize,
    /// Terms in more than this fraction of documents are dropped
    pub max_df: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Per-tree row sub-sample bound; None = all rows
    pub max_samples: Option<usize>,
    /// Expected anomaly proportion, in (0, 0.5]
    pub contamination: f64,
    /// Base RNG seed; tree i draws from seed + i
    pub seed: u64,
    /// Concurrent tree builds; 0 = rayon default
    pub parallelism: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the frozen-model bundle (written after a fresh fit)
    pub path: Option<PathBuf>,
    /// Score with the bundle at `path` instead of refitting
    pub reuse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".logsift"),
            ingest: IngestConfig::default(),
            vectorizer: VectorizerConfig::default(),
            forest: ForestConfig::default(),
            model: ModelConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            extensions: vec!["log".to_string(), "txt".to_string()],
            source_file: None,
            scan_interval_secs: 0,
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            min_df: 2,
            max_df: 0.8,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: None,
            contamination: 0.1,
            seed: 42,
            parallelism: 0,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            reuse: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl AnalyzerConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AnalyzerConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
