use crate::domain::model::{AnalysisResult, SimulationResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of the per-minute weather factor applied to throughput.
pub trait WeatherSource {
    fn next_factor(&mut self) -> f64;
}

pub trait ConfigProvider: Send + Sync {
    fn profile_id(&self) -> &str;
    fn arrival_rate(&self) -> u32;
    fn duration_minutes(&self) -> u32;
    fn peak_hour(&self) -> bool;
    fn seed(&self) -> Option<u64>;
    fn output_path(&self) -> &str;
    fn export_enabled(&self) -> bool;
}

#[async_trait]
pub trait ScenarioPipeline: Send + Sync {
    async fn simulate(&self) -> Result<SimulationResult>;
    async fn analyze(&self, result: SimulationResult) -> Result<AnalysisResult>;
    /// Returns where the results went, or `None` when exporting is off.
    async fn export(&self, analysis: &AnalysisResult) -> Result<Option<String>>;
}
