//! Observability infrastructure for the procurement client.
//!
//! This crate provides:
//! - `RequestId` - Correlation identifier for one user action
//! - `StructuredLogger` - Structured logging with component context
//! - `LogSink` - Where entries go (stderr, or memory for tests)

mod logging;
mod request_id;

pub use logging::*;
pub use request_id::*;
