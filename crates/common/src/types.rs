//! Record model used across the market data entry client
//!
//! A [`MarketDataRecord`] is one entry of a submission batch. Field names
//! on the wire are camelCase and are listed by [`RecordField`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Price property of a market data record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketDataProperty {
    Ask,
    Mid,
    Bid,
    Close,
}

impl MarketDataProperty {
    /// Every accepted property, in display order
    pub const ALL: [MarketDataProperty; 4] = [
        MarketDataProperty::Ask,
        MarketDataProperty::Mid,
        MarketDataProperty::Bid,
        MarketDataProperty::Close,
    ];

    /// Wire value (upper-case)
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDataProperty::Ask => "ASK",
            MarketDataProperty::Mid => "MID",
            MarketDataProperty::Bid => "BID",
            MarketDataProperty::Close => "CLOSE",
        }
    }

    /// Parse an exact wire value. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for MarketDataProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketDataProperty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::invalid_input(format!("unknown market data property: {}", s)))
    }
}

/// Names every field of a [`MarketDataRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    ProviderCode,
    InstrumentCode,
    MarketDataProperty,
    MarketDataCategory,
    MarketDataSource,
    InstrumentCodeDescription,
    Key1,
    Key2,
    FromFactor,
    ToFactor,
    TermInDays,
}

impl RecordField {
    pub const ALL: [RecordField; 11] = [
        RecordField::ProviderCode,
        RecordField::InstrumentCode,
        RecordField::MarketDataProperty,
        RecordField::MarketDataCategory,
        RecordField::MarketDataSource,
        RecordField::InstrumentCodeDescription,
        RecordField::Key1,
        RecordField::Key2,
        RecordField::FromFactor,
        RecordField::ToFactor,
        RecordField::TermInDays,
    ];

    /// camelCase name used in JSON payloads
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::ProviderCode => "providerCode",
            RecordField::InstrumentCode => "instrumentCode",
            RecordField::MarketDataProperty => "marketDataProperty",
            RecordField::MarketDataCategory => "marketDataCategory",
            RecordField::MarketDataSource => "marketDataSource",
            RecordField::InstrumentCodeDescription => "instrumentCodeDescription",
            RecordField::Key1 => "key1",
            RecordField::Key2 => "key2",
            RecordField::FromFactor => "fromFactor",
            RecordField::ToFactor => "toFactor",
            RecordField::TermInDays => "termInDays",
        }
    }

    /// Human readable label, as shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            RecordField::ProviderCode => "Provider Code",
            RecordField::InstrumentCode => "Instrument Code",
            RecordField::MarketDataProperty => "Market Data Property",
            RecordField::MarketDataCategory => "Market Data Category",
            RecordField::MarketDataSource => "Market Data Source",
            RecordField::InstrumentCodeDescription => "Instrument Code Description",
            RecordField::Key1 => "Key 1",
            RecordField::Key2 => "Key 2",
            RecordField::FromFactor => "From Factor",
            RecordField::ToFactor => "To Factor",
            RecordField::TermInDays => "Term In Days",
        }
    }

    fn snake_name(&self) -> &'static str {
        match self {
            RecordField::ProviderCode => "provider_code",
            RecordField::InstrumentCode => "instrument_code",
            RecordField::MarketDataProperty => "market_data_property",
            RecordField::MarketDataCategory => "market_data_category",
            RecordField::MarketDataSource => "market_data_source",
            RecordField::InstrumentCodeDescription => "instrument_code_description",
            RecordField::Key1 => "key1",
            RecordField::Key2 => "key2",
            RecordField::FromFactor => "from_factor",
            RecordField::ToFactor => "to_factor",
            RecordField::TermInDays => "term_in_days",
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordField {
    type Err = Error;

    /// Accepts the camelCase wire name or its snake_case form
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s || f.snake_name() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

/// One market data entry submitted as part of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketDataRecord {
    pub provider_code: String,
    pub instrument_code: String,
    pub market_data_property: String,
    pub market_data_category: String,
    pub market_data_source: String,
    pub instrument_code_description: String,
    pub key1: String,
    pub key2: String,
    pub from_factor: f64,
    pub to_factor: f64,
    pub term_in_days: String,
}

impl Default for MarketDataRecord {
    fn default() -> Self {
        Self {
            provider_code: String::new(),
            instrument_code: String::new(),
            market_data_property: String::new(),
            market_data_category: String::new(),
            market_data_source: String::new(),
            instrument_code_description: String::new(),
            key1: String::new(),
            key2: String::new(),
            from_factor: 1.0,
            to_factor: 1.0,
            term_in_days: "1".to_string(),
        }
    }
}

impl MarketDataRecord {
    /// Current value of a field rendered as text
    pub fn get(&self, field: RecordField) -> String {
        match field {
            RecordField::FromFactor => self.from_factor.to_string(),
            RecordField::ToFactor => self.to_factor.to_string(),
            other => self.text(other).unwrap_or_default().to_string(),
        }
    }

    /// Replace a single field.
    ///
    /// Numeric fields must parse as a number; on failure the record is
    /// left unchanged.
    pub fn set(&mut self, field: RecordField, value: &str) -> Result<()> {
        match field {
            RecordField::FromFactor => self.from_factor = parse_factor(field, value)?,
            RecordField::ToFactor => self.to_factor = parse_factor(field, value)?,
            RecordField::ProviderCode => self.provider_code = value.to_string(),
            RecordField::InstrumentCode => self.instrument_code = value.to_string(),
            RecordField::MarketDataProperty => self.market_data_property = value.to_string(),
            RecordField::MarketDataCategory => self.market_data_category = value.to_string(),
            RecordField::MarketDataSource => self.market_data_source = value.to_string(),
            RecordField::InstrumentCodeDescription => {
                self.instrument_code_description = value.to_string()
            }
            RecordField::Key1 => self.key1 = value.to_string(),
            RecordField::Key2 => self.key2 = value.to_string(),
            RecordField::TermInDays => self.term_in_days = value.to_string(),
        }
        Ok(())
    }

    /// Borrow a text field. Returns `None` for numeric fields.
    pub fn text(&self, field: RecordField) -> Option<&str> {
        let value = match field {
            RecordField::ProviderCode => &self.provider_code,
            RecordField::InstrumentCode => &self.instrument_code,
            RecordField::MarketDataProperty => &self.market_data_property,
            RecordField::MarketDataCategory => &self.market_data_category,
            RecordField::MarketDataSource => &self.market_data_source,
            RecordField::InstrumentCodeDescription => &self.instrument_code_description,
            RecordField::Key1 => &self.key1,
            RecordField::Key2 => &self.key2,
            RecordField::TermInDays => &self.term_in_days,
            RecordField::FromFactor | RecordField::ToFactor => return None,
        };
        Some(value.as_str())
    }
}

fn parse_factor(field: RecordField, value: &str) -> Result<f64> {
    // NaN and infinities have no JSON representation
    match value.trim().parse::<f64>() {
        Ok(factor) if factor.is_finite() => Ok(factor),
        _ => Err(Error::invalid_input(format!(
            "{} must be a finite number, got '{}'",
            field.label(),
            value
        ))),
    }
}
