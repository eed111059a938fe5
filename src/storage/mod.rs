//! Append-only local storage for anomaly results and run summaries.

mod store;

pub use store::{ResultStore, StoreError};
