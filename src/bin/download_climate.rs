use algae_biomass::adapters::power::PowerClient;
use algae_biomass::config::toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};
use algae_biomass::utils::{logger, validation::Validate};
use algae_biomass::{AcquisitionPipeline, EtlEngine, LocalStorage};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "download-climate")]
#[command(about = "Fetch monthly climate aggregates for one point and write the flat climate table")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    #[arg(long)]
    start_year: Option<i32>,

    #[arg(long)]
    end_year: Option<i32>,

    /// Where to write the climate table
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn load_config(args: &Args) -> anyhow::Result<TomlConfig> {
    let mut config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => TomlConfig::from_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("failed to load config file '{}'", DEFAULT_CONFIG_FILE))?,
        None => TomlConfig::default(),
    };

    let acq = &mut config.acquisition;
    if let Some(endpoint) = &args.endpoint {
        acq.endpoint = endpoint.clone();
    }
    if let Some(latitude) = args.latitude {
        acq.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        acq.longitude = longitude;
    }
    if let Some(start_year) = args.start_year {
        acq.start_year = start_year;
    }
    if let Some(end_year) = args.end_year {
        acq.end_year = end_year;
    }
    if let Some(output) = &args.output {
        acq.output_path = output.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose, args.log_json);

    let config = load_config(&args)?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let acq = &config.acquisition;
    let client = PowerClient::new(acq.endpoint.clone(), Duration::from_secs(acq.timeout_seconds))
        .context("failed to build HTTP client")?;
    let pipeline = AcquisitionPipeline::new(
        LocalStorage::new("."),
        client,
        config.power_request(),
        acq.output_path.clone(),
    );

    match EtlEngine::new(pipeline).run().await {
        Ok(output_path) => {
            println!("✅ Saved to {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Download failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}
