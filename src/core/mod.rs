pub mod analysis;
pub mod animation;
pub mod catalog;
pub mod engine;
pub mod estimator;
pub mod export;
pub mod pipeline;
pub mod stepper;

pub use crate::domain::model::{
    AnalysisResult, MinuteSample, SimulationRequest, SimulationResult, SimulationSummary,
};
pub use crate::domain::ports::{ConfigProvider, ScenarioPipeline, Storage, WeatherSource};
pub use crate::utils::error::Result;
