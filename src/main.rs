use algae_biomass::utils::{logger, validation::Validate};
use algae_biomass::{AlgaeError, CliConfig, EtlEngine, LocalStorage, SimulationPipeline};
use anyhow::Context;
use clap::Parser;

fn report_and_exit(e: &AlgaeError) -> ! {
    tracing::error!(
        "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init(cli.verbose, cli.log_json);
    tracing::info!("Starting algae-biomass");
    tracing::debug!("CLI config: {:?}", cli);

    let config = cli.load().context("failed to load configuration")?;

    if let Err(e) = config.validate() {
        report_and_exit(&e);
    }

    let species_table = config
        .species_table()
        .context("failed to build species table")?;
    tracing::info!(
        "Species: {} | seed: {} | input: {}",
        config.simulation.species.join(", "),
        config.simulation.seed,
        config.simulation.input_path
    );

    let storage = LocalStorage::new(".");
    let pipeline = match SimulationPipeline::new(storage, config, &species_table) {
        Ok(pipeline) => pipeline,
        Err(e) => report_and_exit(&e),
    };

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Biomass simulation saved to: {}", output_path);
            Ok(())
        }
        Err(e) => report_and_exit(&e),
    }
}
