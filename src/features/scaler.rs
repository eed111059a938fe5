//! Per-column standardization over the batch: zero mean, unit variance
//! (population std). Recomputed every invocation; the fitted vectors travel
//! with the frozen bundle.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(m: &Array2<f64>) -> Self {
        let n = m.nrows() as f64;
        let cols = m.ncols();
        let mut mean = vec![0.0; cols];
        let mut std = vec![0.0; cols];
        if n == 0.0 {
            return Self { mean, std };
        }
        for (j, col) in m.columns().into_iter().enumerate() {
            let mu = col.sum() / n;
            let var = col.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / n;
            mean[j] = mu;
            std[j] = var.sqrt();
        }
        Self { mean, std }
    }

    /// `(x - mean) / std` per column; constant columns (std 0) map to 0.
    pub fn transform(&self, m: &Array2<f64>) -> Array2<f64> {
        let mut out = m.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            if self.std[j] > 0.0 {
                let (mu, sd) = (self.mean[j], self.std[j]);
                col.mapv_inplace(|v| (v - mu) / sd);
            } else {
                col.fill(0.0);
            }
        }
        out
    }

    pub fn fit_transform(m: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(m);
        let scaled = scaler.transform(m);
        (scaler, scaled)
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}
