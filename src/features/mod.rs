//! Feature extraction: structural block and TF-IDF block per record,
//! concatenated column-wise, then standardized.

pub mod scaler;
pub mod structured;
pub mod tfidf;

pub use scaler::StandardScaler;
pub use structured::{FEATURE_NAMES, STRUCTURED_DIM};
pub use tfidf::TfidfVocabulary;

use ndarray::{concatenate, Array2, Axis};

/// Concatenate `[structured | textual]`. A zero-width textual block (empty
/// vocabulary) leaves the structural block as-is.
pub fn assemble(structured: &Array2<f64>, textual: &Array2<f64>) -> Array2<f64> {
    if textual.ncols() == 0 {
        return structured.clone();
    }
    concatenate(Axis(1), &[structured.view(), textual.view()])
        .expect("structured and textual blocks cover the same records")
}
