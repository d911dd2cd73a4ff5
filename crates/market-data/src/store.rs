//! Record Store - ordered records plus their index-aligned error maps.
//!
//! The two sequences always have the same length and at least one
//! element. Every mutating operation returns a [`StoreChange`] so the
//! presentation layer can re-render without polling.

use crate::error::{StoreError, StoreResult};
use crate::template::RecordTemplate;
use crate::validator::{validate, ErrorMap};
use common::{MarketDataRecord, RecordField};
use tracing::debug;

/// What a store operation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added { index: usize },
    Removed { index: usize },
    FieldUpdated { index: usize, field: RecordField, valid: bool },
    Validated { all_valid: bool },
    Unchanged,
}

/// Owned copy of the store contents
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub records: Vec<MarketDataRecord>,
    pub errors: Vec<ErrorMap>,
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<MarketDataRecord>,
    errors: Vec<ErrorMap>,
    template: RecordTemplate,
    revision: u64,
}

impl RecordStore {
    /// Create a store holding one record built from `template`
    pub fn new(template: RecordTemplate) -> Self {
        Self {
            records: vec![template.build()],
            errors: vec![ErrorMap::new()],
            template,
            revision: 0,
        }
    }

    /// Create a store from an existing batch.
    ///
    /// An empty batch falls back to a single template record. Error maps
    /// start empty until the first validation.
    pub fn from_records(records: Vec<MarketDataRecord>, template: RecordTemplate) -> Self {
        if records.is_empty() {
            return Self::new(template);
        }
        let errors = vec![ErrorMap::new(); records.len()];
        Self {
            records,
            errors,
            template,
            revision: 0,
        }
    }

    /// Append a record and an empty error map
    pub fn add(&mut self, record: MarketDataRecord) -> StoreChange {
        self.records.push(record);
        self.errors.push(ErrorMap::new());
        self.revision += 1;

        let index = self.records.len() - 1;
        debug!(index, len = self.records.len(), "Record added");
        StoreChange::Added { index }
    }

    /// Append a record built from the configured template
    pub fn add_from_template(&mut self) -> StoreChange {
        let record = self.template.build();
        self.add(record)
    }

    /// Remove the record at `index`.
    ///
    /// Removing the last remaining record is silently ignored.
    pub fn remove(&mut self, index: usize) -> StoreResult<StoreChange> {
        if self.records.len() <= 1 {
            debug!(index, "Ignoring removal of the last record");
            return Ok(StoreChange::Unchanged);
        }
        self.check_index(index)?;

        self.records.remove(index);
        self.errors.remove(index);
        self.revision += 1;

        debug!(index, len = self.records.len(), "Record removed");
        Ok(StoreChange::Removed { index })
    }

    /// Replace one field of one record and re-validate that record
    pub fn update_field(
        &mut self,
        index: usize,
        field: RecordField,
        value: &str,
    ) -> StoreResult<StoreChange> {
        self.check_index(index)?;

        self.records[index]
            .set(field, value)
            .map_err(|e| StoreError::InvalidValue(e.to_string()))?;

        let errors = validate(&self.records[index]);
        let valid = errors.is_empty();
        self.errors[index] = errors;
        self.revision += 1;

        debug!(index, field = %field, valid, "Field updated");
        Ok(StoreChange::FieldUpdated { index, field, valid })
    }

    /// Re-validate every record. Returns true when all are valid.
    pub fn validate_all(&mut self) -> bool {
        self.errors = self.records.iter().map(validate).collect();
        self.revision += 1;

        let all_valid = self.errors.iter().all(ErrorMap::is_empty);
        debug!(len = self.records.len(), all_valid, "Validated all records");
        all_valid
    }

    /// [`validate_all`](Self::validate_all) reported as a change
    pub fn validate_all_change(&mut self) -> StoreChange {
        StoreChange::Validated { all_valid: self.validate_all() }
    }

    pub fn records(&self) -> &[MarketDataRecord] {
        &self.records
    }

    pub fn errors(&self) -> &[ErrorMap] {
        &self.errors
    }

    pub fn record(&self, index: usize) -> Option<&MarketDataRecord> {
        self.records.get(index)
    }

    pub fn errors_for(&self, index: usize) -> Option<&ErrorMap> {
        self.errors.get(index)
    }

    /// Indices whose current error map is non-empty
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.errors
            .iter()
            .enumerate()
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: a store holds at least one record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            records: self.records.clone(),
            errors: self.errors.clone(),
            revision: self.revision,
        }
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(RecordTemplate::Blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_record(code: &str) -> MarketDataRecord {
        MarketDataRecord {
            provider_code: "SAPTHR".to_string(),
            instrument_code: code.to_string(),
            market_data_property: "MID".to_string(),
            market_data_category: "01".to_string(),
            market_data_source: "ST".to_string(),
            key1: "INR".to_string(),
            key2: "PJK".to_string(),
            ..MarketDataRecord::default()
        }
    }

    #[test]
    fn test_new_store_has_one_record() {
        let store = RecordStore::default();
        assert_eq!(store.len(), 1);
        assert_eq!(store.errors().len(), 1);
        assert_eq!(store.records()[0], MarketDataRecord::default());
        assert!(store.errors()[0].is_empty());
    }

    #[test]
    fn test_add_appends_template_record() {
        let mut store = RecordStore::default();
        let change = store.add_from_template();

        assert_eq!(change, StoreChange::Added { index: 1 });
        assert_eq!(store.len(), 2);
        assert_eq!(store.errors().len(), 2);
        assert_eq!(store.records()[1], MarketDataRecord::default());
        assert!(store.errors()[1].is_empty());
    }

    #[test]
    fn test_add_demo_template() {
        let mut store = RecordStore::new(RecordTemplate::Demo);
        store.add_from_template();

        let added = store.record(1).unwrap();
        assert_eq!(added.provider_code, "SAPTHR");
        assert_eq!(added.key2, "PJK");
        assert_eq!(added.instrument_code.len(), 6);
    }

    #[test]
    fn test_remove_last_record_is_noop() {
        let mut store = RecordStore::new(RecordTemplate::Blank);
        store.update_field(0, RecordField::Key1, "INR").unwrap();
        let before = store.snapshot();

        assert_eq!(store.remove(0).unwrap(), StoreChange::Unchanged);
        assert_eq!(store.remove(7).unwrap(), StoreChange::Unchanged);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = RecordStore::from_records(
            vec![valid_record("AAA"), valid_record("BBB"), valid_record("CCC")],
            RecordTemplate::Blank,
        );
        store.update_field(2, RecordField::Key1, "").unwrap();

        assert_eq!(store.remove(1).unwrap(), StoreChange::Removed { index: 1 });

        let codes: Vec<_> = store.records().iter().map(|r| r.instrument_code.as_str()).collect();
        assert_eq!(codes, vec!["AAA", "CCC"]);
        assert_eq!(store.errors().len(), 2);
        assert!(store.errors()[1].contains(RecordField::Key1));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = RecordStore::from_records(
            vec![valid_record("AAA"), valid_record("BBB")],
            RecordTemplate::Blank,
        );
        assert_matches!(store.remove(2), Err(StoreError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_field_touches_only_target() {
        let mut store = RecordStore::from_records(
            vec![valid_record("AAA"), valid_record("BBB")],
            RecordTemplate::Blank,
        );
        let before = store.snapshot();

        let change = store.update_field(1, RecordField::ProviderCode, "").unwrap();
        assert_eq!(
            change,
            StoreChange::FieldUpdated { index: 1, field: RecordField::ProviderCode, valid: false }
        );

        let mut expected = before.records[1].clone();
        expected.provider_code.clear();
        assert_eq!(store.records()[1], expected);
        assert_eq!(store.records()[0], before.records[0]);
        assert_eq!(store.errors()[1], validate(&store.records()[1]));
        assert!(store.errors()[0].is_empty());
    }

    #[test]
    fn test_update_field_live_validation_clears_error() {
        let mut store = RecordStore::default();
        store.update_field(0, RecordField::MarketDataProperty, "LAST").unwrap();
        assert!(store.errors()[0].contains(RecordField::MarketDataProperty));

        store.update_field(0, RecordField::MarketDataProperty, "BID").unwrap();
        assert!(!store.errors()[0].contains(RecordField::MarketDataProperty));
    }

    #[test]
    fn test_update_field_rejects_bad_number() {
        let mut store = RecordStore::default();
        let before = store.snapshot();

        assert_matches!(
            store.update_field(0, RecordField::FromFactor, "ten"),
            Err(StoreError::InvalidValue(_))
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_update_field_rejects_nan_factor() {
        let mut store = RecordStore::default();
        let before = store.snapshot();

        assert_matches!(
            store.update_field(0, RecordField::ToFactor, "NaN"),
            Err(StoreError::InvalidValue(_))
        );
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.records()[0].to_factor, 1.0);
    }

    #[test]
    fn test_update_field_out_of_range() {
        let mut store = RecordStore::default();
        assert_matches!(
            store.update_field(3, RecordField::Key1, "X"),
            Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_validate_all_mixed() {
        let mut invalid = valid_record("BBB");
        invalid.market_data_source = "S".repeat(16);

        let mut store =
            RecordStore::from_records(vec![valid_record("AAA"), invalid], RecordTemplate::Blank);

        assert!(!store.validate_all());
        assert!(store.errors()[0].is_empty());
        assert!(!store.errors()[1].is_empty());
        assert_eq!(store.invalid_indices(), vec![1]);
    }

    #[test]
    fn test_validate_all_valid() {
        let mut store = RecordStore::from_records(
            vec![valid_record("AAA"), valid_record("BBB")],
            RecordTemplate::Blank,
        );
        assert_eq!(store.validate_all_change(), StoreChange::Validated { all_valid: true });
        assert!(store.invalid_indices().is_empty());
    }

    #[test]
    fn test_from_empty_records_falls_back_to_template() {
        let store = RecordStore::from_records(Vec::new(), RecordTemplate::Blank);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut store = RecordStore::default();
        assert_eq!(store.revision(), 0);

        store.add_from_template();
        store.update_field(1, RecordField::Key2, "PJK").unwrap();
        assert_eq!(store.revision(), 2);

        store.remove(0).unwrap();
        store.remove(0).unwrap();
        assert_eq!(store.revision(), 3);
    }
}
