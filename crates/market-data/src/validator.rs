//! Per-record validation rules
//!
//! [`validate`] is pure: it maps one record to an [`ErrorMap`] holding a
//! message for every failing field. Every field is checked on its own;
//! within a field "missing" is checked before "too long".

use common::{MarketDataProperty, MarketDataRecord, RecordField};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const PROVIDER_CODE_MAX: usize = 15;
pub const INSTRUMENT_CODE_MAX: usize = 30;
pub const MARKET_DATA_CATEGORY_MAX: usize = 15;
pub const MARKET_DATA_SOURCE_MAX: usize = 15;
pub const INSTRUMENT_CODE_DESCRIPTION_MAX: usize = 1024;
pub const KEY_MAX: usize = 20;

/// A single failed rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{label} is required.")]
    Required { label: &'static str },

    #[error("{label} must be at most {max} characters.")]
    TooLong { label: &'static str, max: usize },

    #[error("Market Data Property must be one of ASK, MID, BID, CLOSE.")]
    InvalidProperty,
}

/// Field name to error message. Empty means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<RecordField, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: RecordField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: RecordField, error: FieldError) {
        self.0.insert(field, error.to_string());
    }
}

/// Validate one record
pub fn validate(record: &MarketDataRecord) -> ErrorMap {
    let mut errors = ErrorMap::new();

    check_required(&mut errors, RecordField::ProviderCode, &record.provider_code, PROVIDER_CODE_MAX);
    check_required(&mut errors, RecordField::InstrumentCode, &record.instrument_code, INSTRUMENT_CODE_MAX);
    check_required(
        &mut errors,
        RecordField::MarketDataCategory,
        &record.market_data_category,
        MARKET_DATA_CATEGORY_MAX,
    );

    if MarketDataProperty::parse(&record.market_data_property).is_none() {
        errors.insert(RecordField::MarketDataProperty, FieldError::InvalidProperty);
    }

    check_required(
        &mut errors,
        RecordField::MarketDataSource,
        &record.market_data_source,
        MARKET_DATA_SOURCE_MAX,
    );

    // Optional: only the length is constrained
    check_max_len(
        &mut errors,
        RecordField::InstrumentCodeDescription,
        &record.instrument_code_description,
        INSTRUMENT_CODE_DESCRIPTION_MAX,
    );

    check_required(&mut errors, RecordField::Key1, &record.key1, KEY_MAX);
    check_required(&mut errors, RecordField::Key2, &record.key2, KEY_MAX);

    errors
}

/// Validate every record of a batch, index-aligned with the input
pub fn validate_all(records: &[MarketDataRecord]) -> Vec<ErrorMap> {
    records.iter().map(validate).collect()
}

fn check_required(errors: &mut ErrorMap, field: RecordField, value: &str, max: usize) {
    if value.is_empty() {
        errors.insert(field, FieldError::Required { label: field.label() });
    } else {
        check_max_len(errors, field, value, max);
    }
}

fn check_max_len(errors: &mut ErrorMap, field: RecordField, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.insert(field, FieldError::TooLong { label: field.label(), max });
    }
}
