use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid endpoint base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Endpoint path must start with '/', got: {0}")]
    InvalidEndpointPath(String),

    #[error("endpoint.timeout_secs must be a positive integer")]
    InvalidTimeout,

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &FormConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_endpoint(&config.endpoint, &mut report);
    validate_credentials(config, &mut report);
    validate_banner(&config.banner, &mut report);

    if !["pretty", "json", "compact"].contains(&config.logging.format.to_lowercase().as_str()) {
        report.add_error(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    report
}

fn validate_endpoint(endpoint: &EndpointConfig, report: &mut ValidationReport) {
    match url::Url::parse(&endpoint.base_url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(parsed) => report.add_error(ConfigError::InvalidBaseUrl {
            url: endpoint.base_url.clone(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => report.add_error(ConfigError::InvalidBaseUrl {
            url: endpoint.base_url.clone(),
            message: e.to_string(),
        }),
    }

    if !endpoint.path.starts_with('/') {
        report.add_error(ConfigError::InvalidEndpointPath(endpoint.path.clone()));
    }

    if endpoint.timeout_secs == Some(0) {
        report.add_error(ConfigError::InvalidTimeout);
    }
}

fn validate_credentials(config: &FormConfig, report: &mut ValidationReport) {
    if has_unresolved_env_vars(&config.access_token) {
        report.add_error(ConfigError::InvalidEnvVar {
            var: ENV_ACCESS_TOKEN.to_string(),
            message: "access_token still contains an unresolved placeholder".to_string(),
        });
    } else if config.access_token.is_empty() {
        report.add_warning(
            "access_token",
            "No access token configured; submissions will send an empty bearer credential",
        );
    }

    if config.prefill_demo_data {
        report.add_warning(
            "prefill_demo_data",
            "New records start with demo data; disable outside development",
        );
    }
}

fn validate_banner(banner: &BannerConfig, report: &mut ValidationReport) {
    if banner.visible_ms == 0 {
        report.add_error(ConfigError::InvalidPositiveInteger {
            field: "banner.visible_ms".to_string(),
        });
    }
    if banner.fade_ms == 0 {
        report.add_error(ConfigError::InvalidPositiveInteger {
            field: "banner.fade_ms".to_string(),
        });
    }
}
