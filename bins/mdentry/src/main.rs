//! Market data entry CLI
//!
//! Entry point for validating, editing and submitting batches of market
//! data records.

mod session;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config_or_default, save_config, validate_config, FormConfig};
use market_data::{
    load_batch, save_batch, validate_all, BannerTimings, HttpMarketDataClient, MarketDataClient,
    MarketDataError, MockMarketDataClient, RecordStore, RecordTemplate, SubmissionFlow,
    SuccessBanner,
};
use observability::{init_logging, LogFormat};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = load_config_or_default(Some(&cli.config))?;

    let format_name = cli
        .log_format
        .map(|f| f.as_str().to_string())
        .unwrap_or_else(|| config.logging.format.clone());
    let format = LogFormat::parse(&format_name).unwrap_or_default();
    init_logging("mdentry", format)?;

    // Loading ran before the subscriber existed
    if let Some(message) = missing_config_notice(&cli.config) {
        warn!("{}", message);
    }

    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output)
        }
        Commands::CheckConfig => {
            info!("Executing 'check-config' command");
            check_config_command(&config)
        }
        Commands::Template { output, count, demo } => {
            info!("Executing 'template' command");
            template_command(&config, output, count, demo)
        }
        Commands::Validate { records } => {
            info!("Executing 'validate' command");
            validate_command(records)
        }
        Commands::Submit { records, dry_run } => {
            info!("Executing 'submit' command");
            submit_command(&config, records, dry_run).await
        }
        Commands::Edit { records } => {
            info!("Executing 'edit' command");
            edit_command(&config, records).await
        }
    }
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Set MARKET_DATA_ACCESS_TOKEN (or edit access_token)");
    println!("  2. Point endpoint.base_url at the market data service");
    println!(
        "  3. Run 'mdentry --config {:?} check-config' to check the configuration",
        output_path
    );

    Ok(())
}

fn check_config_command(config: &FormConfig) -> Result<()> {
    let report = validate_config(config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Endpoint: {}", config.endpoint.url());
    println!("Demo prefill: {}", config.prefill_demo_data);

    Ok(())
}

fn template_command<P: AsRef<Path>>(config: &FormConfig, output: P, count: usize, demo: bool) -> Result<()> {
    let template = if demo {
        RecordTemplate::Demo
    } else {
        RecordTemplate::from_config(config)
    };

    let records: Vec<_> = (0..count.max(1)).map(|_| template.build()).collect();
    save_batch(output.as_ref(), &records)?;

    println!("[ok] Wrote {} record(s) to {:?}", records.len(), output.as_ref());
    Ok(())
}

fn validate_command<P: AsRef<Path>>(records_path: P) -> Result<()> {
    let records = load_batch(records_path.as_ref())
        .with_context(|| format!("Failed to load batch: {:?}", records_path.as_ref()))?;

    let maps = validate_all(&records);
    let mut invalid = 0;
    for (index, errors) in maps.iter().enumerate() {
        if errors.is_empty() {
            continue;
        }
        invalid += 1;
        for (field, message) in errors.iter() {
            println!("[{}] {}: {}", index, field, message);
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} of {} record(s) failed validation", invalid, records.len());
    }

    println!("[ok] All {} record(s) are valid", records.len());
    Ok(())
}

async fn submit_command<P: AsRef<Path>>(config: &FormConfig, records_path: P, dry_run: bool) -> Result<()> {
    let records = load_batch(records_path.as_ref())
        .with_context(|| format!("Failed to load batch: {:?}", records_path.as_ref()))?;

    let client: Arc<dyn MarketDataClient> = if dry_run {
        Arc::new(MockMarketDataClient::new().with_response(serde_json::json!({ "dryRun": true })))
    } else {
        ensure_config_usable(config)?;
        Arc::new(HttpMarketDataClient::from_config(&config.endpoint)?)
    };

    let mut flow = create_flow(config, records, client);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(flow.records())?);
    }

    match flow.submit().await {
        Ok(body) => {
            println!("Market data submitted successfully!");
            if !body.is_null() {
                println!("{}", body);
            }
            Ok(())
        }
        Err(MarketDataError::Validation { invalid_records }) => {
            for index in &invalid_records {
                if let Some(errors) = flow.store().errors_for(*index) {
                    for (field, message) in errors.iter() {
                        println!("[{}] {}: {}", index, field, message);
                    }
                }
            }
            anyhow::bail!("{} record(s) failed validation; nothing was submitted", invalid_records.len())
        }
        Err(e) => {
            error!(%e, "Submission failed");
            println!("Failed to submit market data.");
            Err(e.into())
        }
    }
}

async fn edit_command(config: &FormConfig, records_path: Option<std::path::PathBuf>) -> Result<()> {
    let records = match records_path {
        Some(path) => load_batch(&path).with_context(|| format!("Failed to load batch: {:?}", path))?,
        None => Vec::new(),
    };

    ensure_config_usable(config)?;

    let client: Arc<dyn MarketDataClient> = Arc::new(HttpMarketDataClient::from_config(&config.endpoint)?);
    let mut flow = create_flow(config, records, client);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session::run_session(&mut flow, stdin, &mut stdout).await
}

fn missing_config_notice(path: &Path) -> Option<String> {
    if path.exists() {
        None
    } else {
        Some(format!("Config file {:?} not found, using defaults", path))
    }
}

/// Log config warnings and refuse to talk to the endpoint on config errors
fn ensure_config_usable(config: &FormConfig) -> Result<()> {
    let report = validate_config(config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }
    if let Some(err) = report.errors.first() {
        anyhow::bail!(
            "Configuration is invalid ({} error(s)), first: {}. Run 'mdentry check-config'",
            report.errors.len(),
            err
        );
    }
    Ok(())
}

fn create_flow(
    config: &FormConfig,
    records: Vec<common::MarketDataRecord>,
    client: Arc<dyn MarketDataClient>,
) -> SubmissionFlow {
    let template = RecordTemplate::from_config(config);
    SubmissionFlow::new(
        RecordStore::from_records(records, template),
        client,
        config.access_token.clone(),
        SuccessBanner::new(BannerTimings::from_config(&config.banner)),
    )
}
