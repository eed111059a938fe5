//! The batch transform: raw lines → parsed records → `[structured | tfidf]`
//! matrix → standardization → isolation scores → results + run summary.
//! Stateless: every invocation fits fresh unless given a frozen bundle.

use crate::config::{ForestConfig, VectorizerConfig};
use crate::error::PipelineError;
use crate::features::{self, structured, StandardScaler, TfidfVocabulary};
use crate::forest::{self, IsolationForest};
use crate::model::FrozenModel;
use crate::parser::{self, ParsedLogRecord, RawLogLine};
use crate::report::{self, AnomalyResult, RunSummary};
use tracing::{debug, warn};

/// Batches smaller than this cannot support a contamination cutoff.
const MIN_BATCH: usize = 2;

/// One invocation's output. Results keep the input order and count.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub results: Vec<AnomalyResult>,
    pub summary: RunSummary,
    /// Fitted bundle when a fresh fit occurred; None for frozen runs and
    /// batches too small to fit.
    pub model: Option<FrozenModel>,
}

pub struct AnomalyPipeline {
    vectorizer: VectorizerConfig,
    forest: ForestConfig,
}

impl AnomalyPipeline {
    pub fn new(vectorizer: VectorizerConfig, forest: ForestConfig) -> Result<Self, PipelineError> {
        if !(forest.contamination > 0.0 && forest.contamination <= 0.5) {
            return Err(PipelineError::Contamination(forest.contamination));
        }
        if vectorizer.max_features == 0 {
            return Err(PipelineError::MaxFeatures);
        }
        Ok(Self { vectorizer, forest })
    }

    /// Fit on the batch and score it. `source_filter` is only recorded in the
    /// run summary.
    pub fn run(
        &self,
        batch: &[RawLogLine],
        source_filter: Option<&str>,
    ) -> Result<PipelineRun, PipelineError> {
        if batch.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        let records = parser::parse_batch(batch);
        if records.len() < MIN_BATCH {
            return Ok(self.degenerate_run(&records, source_filter));
        }

        let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
        let structured = structured::extract(&records);
        let vocabulary = TfidfVocabulary::fit(&messages, &self.vectorizer);
        if vocabulary.is_empty() {
            warn!("vocabulary collapsed to zero terms; scoring on structural features only");
        } else {
            debug!(terms = vocabulary.len(), "vocabulary fitted");
        }
        let textual = vocabulary.transform(&messages);
        let matrix = features::assemble(&structured, &textual);

        let (scaler, scaled) = StandardScaler::fit_transform(&matrix);
        let ensemble = IsolationForest::fit_with_parallelism(scaled.view(), &self.forest);
        let scores = ensemble.score_samples(scaled.view());
        let threshold = forest::score_threshold(&scores, self.forest.contamination);

        let results = report::build_results(&records, &scores, threshold);
        let summary = report::summarize(&results, self.forest.contamination, source_filter);
        debug!(
            total = summary.total_records,
            anomalies = summary.anomalies_detected,
            "batch scored"
        );
        Ok(PipelineRun {
            results,
            summary,
            model: Some(FrozenModel {
                vocabulary,
                scaler,
                forest: ensemble,
                threshold,
                contamination: self.forest.contamination,
            }),
        })
    }

    /// Score with a previously fitted bundle, no refit: frozen vocabulary,
    /// scaler, trees, and threshold. Identical batch and bundle reproduce
    /// identical results.
    pub fn run_frozen(
        &self,
        model: &FrozenModel,
        batch: &[RawLogLine],
        source_filter: Option<&str>,
    ) -> Result<PipelineRun, PipelineError> {
        if batch.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        let records = parser::parse_batch(batch);

        let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
        let structured = structured::extract(&records);
        let textual = model.vocabulary.transform(&messages);
        let matrix = features::assemble(&structured, &textual);
        if matrix.ncols() != model.feature_dim() {
            return Err(PipelineError::ModelMismatch {
                expected: model.feature_dim(),
                actual: matrix.ncols(),
            });
        }

        let scaled = model.scaler.transform(&matrix);
        let scores = model.forest.score_samples(scaled.view());
        let results = report::build_results(&records, &scores, model.threshold);
        let summary = report::summarize(&results, model.contamination, source_filter);
        Ok(PipelineRun {
            results,
            summary,
            model: None,
        })
    }

    /// ThresholdUndefined path: a batch too small for a contamination cutoff
    /// comes back all-normal with score 0 instead of erroring.
    fn degenerate_run(
        &self,
        records: &[ParsedLogRecord],
        source_filter: Option<&str>,
    ) -> PipelineRun {
        warn!(
            total = records.len(),
            "batch below contamination cutoff minimum; labeling all normal"
        );
        let scores = vec![0.0; records.len()];
        let results = report::build_results(records, &scores, None);
        let summary = report::summarize(&results, self.forest.contamination, source_filter);
        PipelineRun {
            results,
            summary,
            model: None,
        }
    }
}
