//! Structured JSON logging.

mod format;

pub use format::{AuditLog, StructuredLogger};
