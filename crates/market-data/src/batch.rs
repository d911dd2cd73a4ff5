//! Batch files - JSON arrays or YAML sequences of records

use crate::Result;
use common::MarketDataRecord;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchFormat {
    Json,
    Yaml,
}

impl BatchFormat {
    /// `.json` is JSON, anything else is read as YAML
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => BatchFormat::Json,
            _ => BatchFormat::Yaml,
        }
    }
}

/// Read a batch of records. Missing fields take the record defaults.
pub fn load_batch<P: AsRef<Path>>(path: P) -> Result<Vec<MarketDataRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    debug!("Batch file content length: {} bytes", content.len());

    let records: Vec<MarketDataRecord> = match BatchFormat::from_path(path) {
        BatchFormat::Json => serde_json::from_str(&content)?,
        BatchFormat::Yaml => serde_yaml::from_str(&content)?,
    };

    info!(path = ?path, records = records.len(), "Loaded batch file");
    Ok(records)
}

/// Write a batch of records, pretty JSON or YAML by extension
pub fn save_batch<P: AsRef<Path>>(path: P, records: &[MarketDataRecord]) -> Result<()> {
    let path = path.as_ref();
    let content = match BatchFormat::from_path(path) {
        BatchFormat::Json => serde_json::to_string_pretty(records)?,
        BatchFormat::Yaml => serde_yaml::to_string(records)?,
    };
    fs::write(path, content)?;

    info!(path = ?path, records = records.len(), "Saved batch file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketDataError;
    use crate::template::RecordTemplate;
    use assert_matches::assert_matches;

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let records = vec![RecordTemplate::Demo.build(), RecordTemplate::Blank.build()];

        save_batch(&path, &records).unwrap();
        assert_eq!(load_batch(&path).unwrap(), records);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["providerCode"], "SAPTHR");
    }

    #[test]
    fn test_load_yaml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.yaml");
        fs::write(
            &path,
            "- providerCode: SAPTHR\n  instrumentCode: ABCDEF\n  marketDataProperty: BID\n",
        )
        .unwrap();

        let records = load_batch(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].market_data_property, "BID");
        assert_eq!(records[0].term_in_days, "1");
        assert_eq!(records[0].from_factor, 1.0);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(load_batch(dir.path().join("missing.json")), Err(MarketDataError::Io(_)));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert_matches!(load_batch(&path), Err(MarketDataError::Serialization(_)));
    }
}
