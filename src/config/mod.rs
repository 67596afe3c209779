pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "traffic-sim")]
#[command(about = "Simulate traffic flow through an intersection under different interventions")]
pub struct CliConfig {
    /// Intervention id or name, e.g. `roundabout` or "Overpass Bridge"
    #[arg(long, default_value = "traffic_lights")]
    pub profile: String,

    /// Vehicles arriving per minute
    #[arg(long, default_value = "60")]
    pub rate: u32,

    /// Simulated minutes
    #[arg(long, default_value = "60")]
    pub duration: u32,

    /// Apply the peak-period penalty to minutes 15-45 of every hour
    #[arg(long)]
    pub peak_hour: bool,

    /// Seed for the weather jitter; omit for a fresh run every time
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Write the CSV/JSON archive to the output path
    #[arg(long)]
    pub export: bool,

    /// Print the intervention catalog and exit
    #[arg(long)]
    pub list_profiles: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn profile_id(&self) -> &str {
        &self.profile
    }

    fn arrival_rate(&self) -> u32 {
        self.rate
    }

    fn duration_minutes(&self) -> u32 {
        self.duration
    }

    fn peak_hour(&self) -> bool {
        self.peak_hour
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn export_enabled(&self) -> bool {
        self.export
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("profile", &self.profile)?;
        crate::core::catalog::find(&self.profile)?;
        crate::utils::validation::validate_positive_number("rate", self.rate.into(), 1)?;
        crate::utils::validation::validate_positive_number("duration", self.duration.into(), 1)?;
        if self.export {
            validate_path("output_path", &self.output_path)?;
        }
        Ok(())
    }
}
