//! Model persistence: the frozen bundle that lets a fitted pipeline score
//! new batches without refitting.

mod frozen;

pub use frozen::{FrozenModel, ModelError};
