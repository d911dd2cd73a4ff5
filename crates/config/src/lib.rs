use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top level configuration for the market data entry client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: EndpointConfig,
    /// Bearer credential sent with every submission
    #[serde(default)]
    pub access_token: String,
    /// Start new records with the fixed demo data set (development only)
    #[serde(default)]
    pub prefill_demo_data: bool,
    #[serde(default = "default_banner")]
    pub banner: BannerConfig,
    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_token: String::new(),
            prefill_demo_data: false,
            banner: default_banner(),
            logging: default_logging(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint_path")]
    pub path: String,
    /// Request timeout. Unset leaves the HTTP client defaults in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl EndpointConfig {
    /// Full submission URL (base URL joined with the endpoint path)
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Timings of the success banner shown after a submission
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BannerConfig {
    #[serde(default = "default_banner_visible_ms")]
    pub visible_ms: u64,
    #[serde(default = "default_banner_fade_ms")]
    pub fade_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}
