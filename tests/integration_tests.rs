use std::io::Read;
use tempfile::TempDir;
use traffic_sim::core::engine::EngineOutput;
use traffic_sim::{CliConfig, LocalStorage, ScenarioConfig, SimulationEngine, SimulationPipeline};

fn cli_config(output_path: &str, export: bool) -> CliConfig {
    CliConfig {
        profile: "Redesigned Lanes".to_string(),
        rate: 60,
        duration: 75,
        peak_hour: true,
        seed: Some(1234),
        output_path: output_path.to_string(),
        export,
        list_profiles: false,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_simulation_with_export() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SimulationPipeline::new(storage, cli_config(&output_path, true))?;
    let engine = SimulationEngine::new_with_monitoring(pipeline, false);

    let output = engine.run().await?;
    let summary = &output.analysis.summary;
    assert_eq!(summary.profile_id, "redesigned_lanes");
    assert_eq!(summary.duration_minutes, 75);
    assert_eq!(summary.peak_minutes, 31);
    assert_eq!(summary.five_year_total_cost, 8_500_000.0);
    assert!(summary.average_wait_seconds > 0.0);
    assert_eq!(output.analysis.samples.len(), 75);

    let reported = output.output_path.expect("export was enabled");
    assert!(reported.ends_with("simulation_output.zip"));

    let full_path = temp_dir.path().join("simulation_output.zip");
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&full_path)?)?;
    assert_eq!(archive.len(), 4);

    let mut csv_content = String::new();
    archive
        .by_name("wait_times.csv")?
        .read_to_string(&mut csv_content)?;
    assert!(csv_content.starts_with("minute,efficiency,passed_vehicles,wait_seconds,congestion_pct"));
    assert_eq!(csv_content.lines().count(), 76);

    let mut comparison = String::new();
    archive
        .by_name("comparison.csv")?
        .read_to_string(&mut comparison)?;
    assert!(comparison.contains("Underground Tunnel"));
    assert!(comparison.contains("Smart Traffic System"));

    Ok(())
}

async fn run_without_export(output_path: &str) -> traffic_sim::Result<EngineOutput> {
    let storage = LocalStorage::new(output_path);
    let pipeline = SimulationPipeline::new(storage, cli_config(output_path, false))?;
    SimulationEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_seeded_runs_produce_identical_summaries() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let first = run_without_export(&output_path).await?;
    let second = run_without_export(&output_path).await?;
    assert_eq!(
        first.analysis.summary.total_vehicles_processed,
        second.analysis.summary.total_vehicles_processed
    );
    assert_eq!(
        first.analysis.summary.average_wait_seconds,
        second.analysis.summary.average_wait_seconds
    );
    assert!(first.output_path.is_none());
    assert!(!temp_dir.path().join("simulation_output.zip").exists());

    Ok(())
}

#[tokio::test]
async fn test_scenario_file_drives_the_engine() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    // TOML strings treat backslashes as escapes
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let config = ScenarioConfig::from_toml_str(&format!(
        r#"
[scenario]
name = "school-run"
profile = "Traffic Lights"
arrival_rate = 100
duration_minutes = 30
seed = 8

[output]
path = "{}"
"#,
        output_path
    ))?;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SimulationPipeline::new(storage, config)?;
    let output = SimulationEngine::new(pipeline).run().await?;

    assert_eq!(output.analysis.summary.profile_name, "Traffic Lights");
    // weather keeps every minute within 80 * [0.8, 1.2]
    let total = output.analysis.summary.total_vehicles_processed;
    assert!((1920..=2880).contains(&total), "total {}", total);
    assert!(temp_dir.path().join("simulation_output.zip").exists());

    Ok(())
}

#[test]
fn test_invalid_requests_are_rejected_before_running() {
    let mut config = cli_config("./unused", false);
    config.duration = 0;
    let storage = LocalStorage::new("./unused");
    assert!(SimulationPipeline::new(storage.clone(), config).is_err());

    let mut config = cli_config("./unused", false);
    config.profile = "Select an option".to_string();
    assert!(SimulationPipeline::new(storage, config).is_err());
}
