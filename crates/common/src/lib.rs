//! Common types and utilities for the market data entry client
//!
//! This crate provides the record model shared by the configuration,
//! validation and submission crates.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Record model (MarketDataRecord, RecordField, MarketDataProperty)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
