//! Frozen model bundle: fitted vocabulary, scaler, ensemble, and decision
//! threshold, serialized as JSON so later batches can be scored without a
//! refit.

use crate::features::{StandardScaler, TfidfVocabulary};
use crate::forest::IsolationForest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model io: {0}")]
    Io(#[from] std::io::Error),
    #[error("model decode: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrozenModel {
    pub vocabulary: TfidfVocabulary,
    pub scaler: StandardScaler,
    pub forest: IsolationForest,
    /// Threshold from the fitting batch; None when that batch selected no
    /// anomalies.
    pub threshold: Option<f64>,
    pub contamination: f64,
}

impl FrozenModel {
    /// Feature width the bundle was fitted on (structural + textual columns).
    pub fn feature_dim(&self) -> usize {
        self.scaler.dim()
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let data = serde_json::to_vec(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
