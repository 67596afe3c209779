use clap::Parser;
use traffic_sim::core::{analysis, catalog};
use traffic_sim::utils::error::{ErrorSeverity, SimError};
use traffic_sim::utils::{logger, validation::Validate};
use traffic_sim::{CliConfig, LocalStorage, SimulationEngine, SimulationPipeline};

fn exit_code(e: &SimError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: SimError) -> ! {
    tracing::error!(
        "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

fn print_catalog() {
    for profile in catalog::all() {
        println!("{} ({})", profile.name, profile.id);
        println!("  Description: {}", profile.description);
        println!(
            "  Implementation Cost: {}",
            analysis::format_currency(profile.implementation_cost)
        );
        println!(
            "  Annual Maintenance: {}",
            analysis::format_currency(profile.annual_maintenance_cost)
        );
        println!(
            "  Average Wait Time: {} seconds",
            profile.baseline_wait_time_seconds
        );
        println!(
            "  Efficiency Rating: {}%",
            profile.efficiency_multiplier * 100.0
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting traffic-sim");
    tracing::debug!("CLI config: {:?}", config);

    if config.list_profiles {
        print_catalog();
        return Ok(());
    }

    if let Err(e) = config.validate() {
        fail(e);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SimulationPipeline::new(storage, config).unwrap_or_else(|e| fail(e));
    let engine = SimulationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            println!("{}", analysis::render_report(&output.analysis.summary));
            println!();
            println!("EFFICIENCY / COST COMPARISON");
            println!("==================");
            for row in &output.analysis.comparison {
                println!(
                    "{:<22} {:>5.0}%  ₱{:.1}M",
                    row.solution, row.efficiency_pct, row.cost_millions
                );
            }
            if let Some(path) = output.output_path {
                println!();
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => fail(e),
    }

    Ok(())
}
