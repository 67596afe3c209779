use clap::Parser;
use traffic_sim::core::estimator::{self, RandomWeather};
use traffic_sim::core::{analysis, catalog, ConfigProvider, MinuteSample, SimulationRequest};
use traffic_sim::utils::error::ErrorSeverity;
use traffic_sim::utils::{logger, validation::Validate};
use traffic_sim::{LocalStorage, ScenarioConfig, SimulationEngine, SimulationPipeline};

#[derive(Parser)]
#[command(name = "toml-scenario")]
#[command(about = "Run a traffic scenario described in a TOML file")]
struct Args {
    /// Path to the scenario file
    #[arg(short, long, default_value = "sim-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the peak-hour setting from config
    #[arg(long)]
    peak_hour: Option<bool>,

    /// Override the weather seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Print one status line per simulated minute
    #[arg(long)]
    progress: bool,

    /// Validate and show the scenario without running it
    #[arg(long)]
    dry_run: bool,
}

fn status_line(sample: &MinuteSample) -> String {
    let markers = "●".repeat(sample.flow_indicators() as usize);
    format!(
        "Time: {:02}:{:02}  Vehicles/min: {:>6.1}  Current wait: {:>6.1}s  Congestion: {:>3}%  {}",
        sample.minute / 60,
        sample.minute % 60,
        sample.passed_vehicles,
        sample.wait_seconds,
        (sample.congestion_level() * 100.0) as u32,
        markers
    )
}

fn display_scenario(config: &ScenarioConfig) {
    tracing::info!("📋 Scenario Summary:");
    if let Some(name) = &config.scenario.name {
        tracing::info!("   Name: {}", name);
    }
    tracing::info!("   Solution: {}", config.profile_id());
    tracing::info!("   Arrival rate: {} vehicles/min", config.arrival_rate());
    tracing::info!("   Duration: {} minutes", config.duration_minutes());
    tracing::info!("   Peak hour: {}", config.peak_hour());
    tracing::info!("   Export: {}", config.export_enabled());
    if config.export_enabled() {
        tracing::info!("   Output Path: {}", config.output_path());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match ScenarioConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load scenario file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), args.verbose);
    tracing::info!("🚀 Loaded scenario from: {}", args.config);

    if let Some(peak) = args.peak_hour {
        config.scenario.peak_hour = Some(peak);
        tracing::info!("🔧 Peak hour overridden to: {}", peak);
    }
    if let Some(seed) = args.seed {
        config.scenario.seed = Some(seed);
    }
    // the progress pass and the engine run must draw the same weather
    if args.progress && config.scenario.seed.is_none() {
        config.scenario.seed = Some(rand::random());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_scenario(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - scenario is valid, nothing was simulated");
        return Ok(());
    }

    if args.progress {
        let request = SimulationRequest::new(
            catalog::find(config.profile_id())?,
            config.arrival_rate(),
            config.duration_minutes(),
            config.peak_hour(),
        )?;
        let mut weather = RandomWeather::from_seed(config.seed());
        for sample in estimator::minutes(&request, &mut weather) {
            println!("{}", status_line(&sample));
        }
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SimulationPipeline::new(storage, config)?;
    let engine = SimulationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            println!("{}", analysis::render_report(&output.analysis.summary));
            if let Some(path) = output.output_path {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Scenario failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
