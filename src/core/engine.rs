use crate::core::{AnalysisResult, ScenarioPipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug)]
pub struct EngineOutput {
    pub analysis: AnalysisResult,
    pub output_path: Option<String>,
}

pub struct SimulationEngine<P: ScenarioPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: ScenarioPipeline> SimulationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<EngineOutput> {
        tracing::info!("Starting traffic simulation...");
        self.monitor.log_stats("Start");

        let result = self.pipeline.simulate().await?;
        tracing::info!("Simulated {} minutes", result.wait_times_seconds.len());
        self.monitor.log_stats("Simulate");

        let analysis = self.pipeline.analyze(result).await?;
        self.monitor.log_stats("Analyze");

        let output_path = self.pipeline.export(&analysis).await?;
        self.monitor.log_stats("Export");
        self.monitor.log_final_stats();

        Ok(EngineOutput {
            analysis,
            output_path,
        })
    }
}
