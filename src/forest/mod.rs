//! Isolation-forest ensemble: seeded per-tree sub-sampling, embarrassingly
//! parallel construction, path-length scoring.

mod tree;

pub use tree::{average_path_length, IsolationTree};

use crate::config::ForestConfig;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    subsample_size: usize,
}

impl IsolationForest {
    /// Fit `n_estimators` trees on `data`. Tree i seeds its own RNG with
    /// `seed + i`, so output is independent of scheduling and parallelism.
    pub fn fit(data: ArrayView2<'_, f64>, config: &ForestConfig) -> Self {
        let n_rows = data.nrows();
        let subsample_size = config
            .max_samples
            .map(|m| m.min(n_rows))
            .unwrap_or(n_rows)
            .max(2);
        let max_depth = (subsample_size as f64).log2().ceil() as usize;

        let trees: Vec<IsolationTree> = (0..config.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let rows: Vec<usize> = if subsample_size < n_rows {
                    index::sample(&mut rng, n_rows, subsample_size).into_vec()
                } else {
                    (0..n_rows).collect()
                };
                IsolationTree::fit(data, &rows, max_depth, &mut rng)
            })
            .collect();

        Self {
            trees,
            subsample_size,
        }
    }

    /// Fit inside a dedicated rayon pool of `config.parallelism` threads;
    /// 0 uses the default pool.
    pub fn fit_with_parallelism(data: ArrayView2<'_, f64>, config: &ForestConfig) -> Self {
        if config.parallelism == 0 {
            return Self::fit(data, config);
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .build()
        {
            Ok(pool) => pool.install(|| Self::fit(data, config)),
            Err(e) => {
                warn!(error = %e, "thread pool build failed; using default pool");
                Self::fit(data, config)
            }
        }
    }

    /// Anomaly score per row: `2^(-avg_path / c(subsample_size))`, in (0, 1).
    /// Near 1 means easy isolation; near 0.5 means typical depth.
    pub fn score_samples(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        if self.trees.is_empty() {
            return vec![0.0; data.nrows()];
        }
        let c = average_path_length(self.subsample_size);
        (0..data.nrows())
            .map(|i| {
                let row = data.row(i);
                let avg = self
                    .trees
                    .iter()
                    .map(|t| t.path_length(row))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                2f64.powf(-avg / c)
            })
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn subsample_size(&self) -> usize {
        self.subsample_size
    }
}

/// Decision threshold: the k-th largest score with `k = round(contamination * n)`,
/// i.e. the `(1 - contamination)` percentile of the batch distribution. None
/// when the cutoff selects nothing.
pub fn score_threshold(scores: &[f64], contamination: f64) -> Option<f64> {
    let n = scores.len();
    let k = ((contamination * n as f64).round() as usize).min(n);
    if k == 0 {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    Some(sorted[k - 1])
}
