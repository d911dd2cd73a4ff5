//! Observability infrastructure for the market data entry client
//!
//! Structured logging via `tracing`.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("mdentry", LogFormat::Pretty)?;
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_with_default, LogFormat};
