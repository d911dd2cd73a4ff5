pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_ENDPOINT_PATH: &str = "/instrumentCode";

pub const ENV_ENDPOINT: &str = "MARKET_DATA_ENDPOINT";
pub const ENV_ACCESS_TOKEN: &str = "MARKET_DATA_ACCESS_TOKEN";
pub const ENV_PREFILL: &str = "MARKET_DATA_PREFILL";

pub fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

pub fn default_banner_visible_ms() -> u64 {
    3000
}

pub fn default_banner_fade_ms() -> u64 {
    500
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_endpoint() -> super::EndpointConfig {
    super::EndpointConfig {
        base_url: default_base_url(),
        path: default_endpoint_path(),
        timeout_secs: None,
    }
}

pub fn default_banner() -> super::BannerConfig {
    super::BannerConfig {
        visible_ms: default_banner_visible_ms(),
        fade_ms: default_banner_fade_ms(),
    }
}

pub fn default_logging() -> super::LoggingConfig {
    super::LoggingConfig {
        format: default_log_format(),
    }
}
