pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::ScenarioConfig};

pub use core::{engine::SimulationEngine, pipeline::SimulationPipeline};
pub use utils::error::{Result, SimError};
