use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load a configuration file and apply environment overrides.
///
/// Resolution order for each overridable setting is ENV > FILE > DEFAULT.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FormConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let mut config: FormConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    apply_env_overrides(&mut config)?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load the given file, or fall back to defaults when no file is given
/// or the file does not exist. Environment overrides apply either way.
pub fn load_config_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<FormConfig> {
    match path {
        Some(path) if path.as_ref().exists() => load_config(path),
        Some(path) => {
            debug!(
                "Config file {:?} not found, using defaults",
                path.as_ref()
            );
            from_env()
        }
        None => from_env(),
    }
}

/// Default configuration with environment overrides applied.
///
/// The access token stays empty unless `MARKET_DATA_ACCESS_TOKEN` is set.
pub fn from_env() -> Result<FormConfig> {
    let mut config = FormConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Apply `MARKET_DATA_*` environment variables on top of `config`
pub fn apply_env_overrides(config: &mut FormConfig) -> Result<()> {
    if let Some(endpoint) = substitution::env_override(ENV_ENDPOINT) {
        config.endpoint.base_url = endpoint;
    }

    if let Some(token) = substitution::env_override(ENV_ACCESS_TOKEN) {
        config.access_token = token;
    }

    if let Some(flag) = substitution::env_override(ENV_PREFILL) {
        config.prefill_demo_data = parse_flag(&flag)
            .with_context(|| format!("Invalid value for {}: {}", ENV_PREFILL, flag))?;
    }

    Ok(())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

/// Starter configuration written by `init`. The token is a placeholder
/// resolved from the environment when the file is loaded.
#[instrument]
pub fn generate_default_config() -> FormConfig {
    FormConfig {
        access_token: format!("${{{}}}", ENV_ACCESS_TOKEN),
        ..FormConfig::default()
    }
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &FormConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdentry.yaml");

        let mut config = FormConfig::default();
        config.access_token = "file-token".to_string();
        config.banner.visible_ms = 1200;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.banner.visible_ms, 1200);
        assert_eq!(loaded.endpoint, config.endpoint);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_default_config_references_token_env_var() {
        let config = generate_default_config();
        assert_eq!(config.access_token, "${MARKET_DATA_ACCESS_TOKEN}");
        assert!(!config.prefill_demo_data);
    }

    #[test]
    fn test_missing_file_without_token_env_uses_empty_token() {
        std::env::remove_var(ENV_ACCESS_TOKEN);

        let config = load_config_or_default(Some("/nonexistent/mdentry.yaml")).unwrap();
        assert_eq!(config.access_token, "");
        assert!(!has_unresolved_env_vars(&config.access_token));
        assert_eq!(config.endpoint, default_endpoint());
    }
}
