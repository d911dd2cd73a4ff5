//! Starting values for newly added records

use common::{MarketDataProperty, MarketDataRecord};
use config::FormConfig;

const DEMO_INSTRUMENT_CODE_LEN: usize = 6;

/// How a freshly added record is filled in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordTemplate {
    /// All-empty record with default factors and term
    #[default]
    Blank,
    /// Fixed demo data set with a random instrument code (development only)
    Demo,
}

impl RecordTemplate {
    pub fn from_config(config: &FormConfig) -> Self {
        if config.prefill_demo_data {
            RecordTemplate::Demo
        } else {
            RecordTemplate::Blank
        }
    }

    pub fn build(&self) -> MarketDataRecord {
        match self {
            RecordTemplate::Blank => MarketDataRecord::default(),
            RecordTemplate::Demo => demo_record(),
        }
    }
}

fn demo_record() -> MarketDataRecord {
    MarketDataRecord {
        provider_code: "SAPTHR".to_string(),
        instrument_code: random_instrument_code(),
        market_data_property: MarketDataProperty::Close.as_str().to_string(),
        market_data_category: "01".to_string(),
        market_data_source: "ST".to_string(),
        instrument_code_description: "Test Rics".to_string(),
        key1: "INR".to_string(),
        key2: "PJK".to_string(),
        from_factor: 1.0,
        to_factor: 1.0,
        term_in_days: "1".to_string(),
    }
}

fn random_instrument_code() -> String {
    (0..DEMO_INSTRUMENT_CODE_LEN)
        .map(|_| fastrand::uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    #[test]
    fn test_blank_template() {
        assert_eq!(RecordTemplate::Blank.build(), MarketDataRecord::default());
    }

    #[test]
    fn test_demo_template() {
        let record = RecordTemplate::Demo.build();

        assert_eq!(record.provider_code, "SAPTHR");
        assert_eq!(record.market_data_property, "CLOSE");
        assert_eq!(record.market_data_category, "01");
        assert_eq!(record.market_data_source, "ST");
        assert_eq!(record.instrument_code_description, "Test Rics");
        assert_eq!(record.key1, "INR");
        assert_eq!(record.key2, "PJK");
        assert_eq!(record.from_factor, 1.0);
        assert_eq!(record.to_factor, 1.0);
        assert_eq!(record.term_in_days, "1");

        assert_eq!(record.instrument_code.len(), 6);
        assert!(record.instrument_code.chars().all(|c| c.is_ascii_uppercase()));
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = FormConfig::default();
        assert_eq!(RecordTemplate::from_config(&config), RecordTemplate::Blank);

        config.prefill_demo_data = true;
        assert_eq!(RecordTemplate::from_config(&config), RecordTemplate::Demo);
    }
}
