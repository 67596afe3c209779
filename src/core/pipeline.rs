use crate::core::estimator::{self, RandomWeather};
use crate::core::{analysis, catalog, export};
use crate::core::{AnalysisResult, ConfigProvider, ScenarioPipeline, SimulationResult, Storage};
use crate::domain::model::SimulationRequest;
use crate::utils::error::Result;

/// Runs one scenario: estimate the flow, summarize it, and optionally write
/// the export archive through `storage`.
pub struct SimulationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    request: SimulationRequest,
}

impl<S: Storage, C: ConfigProvider> SimulationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let profile = catalog::find(config.profile_id())?;
        let request = SimulationRequest::new(
            profile,
            config.arrival_rate(),
            config.duration_minutes(),
            config.peak_hour(),
        )?;

        Ok(Self {
            storage,
            config,
            request,
        })
    }

    pub fn request(&self) -> &SimulationRequest {
        &self.request
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> ScenarioPipeline for SimulationPipeline<S, C> {
    async fn simulate(&self) -> Result<SimulationResult> {
        let request = &self.request;
        tracing::info!(
            "🚦 Simulating {} at {} vehicles/min for {} minutes (peak hour: {})",
            request.profile.name,
            request.arrival_rate_per_minute,
            request.duration_minutes,
            request.peak_hour_enabled
        );
        if let Some(seed) = self.config.seed() {
            tracing::debug!("Weather seed: {}", seed);
        }

        let mut weather = RandomWeather::from_seed(self.config.seed());
        Ok(estimator::simulate(request, &mut weather))
    }

    async fn analyze(&self, result: SimulationResult) -> Result<AnalysisResult> {
        let analysis = analysis::analyze(&self.request, result);
        tracing::info!(
            "📊 {} vehicles processed, average wait {:.1}s",
            analysis.summary.total_vehicles_processed,
            analysis.summary.average_wait_seconds
        );
        Ok(analysis)
    }

    async fn export(&self, analysis: &AnalysisResult) -> Result<Option<String>> {
        if !self.config.export_enabled() {
            tracing::debug!("Export disabled, skipping archive");
            return Ok(None);
        }

        let archive = export::build_archive(analysis)?;
        tracing::debug!("Writing archive ({} bytes) to storage", archive.len());
        self.storage.write_file(export::ARCHIVE_NAME, &archive).await?;

        let output_path = format!("{}/{}", self.config.output_path(), export::ARCHIVE_NAME);
        tracing::info!("💾 Results saved: {}", output_path);
        Ok(Some(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SimError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SimError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        profile: &'static str,
        rate: u32,
        duration: u32,
        export: bool,
    }

    impl ConfigProvider for TestConfig {
        fn profile_id(&self) -> &str {
            self.profile
        }
        fn arrival_rate(&self) -> u32 {
            self.rate
        }
        fn duration_minutes(&self) -> u32 {
            self.duration
        }
        fn peak_hour(&self) -> bool {
            false
        }
        fn seed(&self) -> Option<u64> {
            Some(42)
        }
        fn output_path(&self) -> &str {
            "out"
        }
        fn export_enabled(&self) -> bool {
            self.export
        }
    }

    fn config(profile: &'static str, rate: u32, duration: u32, export: bool) -> TestConfig {
        TestConfig {
            profile,
            rate,
            duration,
            export,
        }
    }

    #[tokio::test]
    async fn test_pipeline_runs_all_stages() {
        let storage = MockStorage::default();
        let pipeline =
            SimulationPipeline::new(storage.clone(), config("Roundabout", 40, 30, true)).unwrap();

        let result = pipeline.simulate().await.unwrap();
        assert_eq!(result.wait_times_seconds.len(), 30);

        let analysis = pipeline.analyze(result).await.unwrap();
        assert_eq!(analysis.summary.profile_id, "roundabout");

        let path = pipeline.export(&analysis).await.unwrap();
        assert_eq!(path.as_deref(), Some("out/simulation_output.zip"));
        assert!(!storage
            .read_file(export::ARCHIVE_NAME)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_seeded_runs_repeat() {
        let a = SimulationPipeline::new(MockStorage::default(), config("overpass", 75, 20, false))
            .unwrap();
        let b = SimulationPipeline::new(MockStorage::default(), config("overpass", 75, 20, false))
            .unwrap();

        let first = a.simulate().await.unwrap();
        let second = b.simulate().await.unwrap();
        assert_eq!(first.wait_times_seconds, second.wait_times_seconds);
        assert_eq!(first.total_vehicles_processed, second.total_vehicles_processed);
    }

    #[tokio::test]
    async fn test_export_can_be_disabled() {
        let storage = MockStorage::default();
        let pipeline =
            SimulationPipeline::new(storage.clone(), config("roundabout", 10, 5, false)).unwrap();
        let result = pipeline.simulate().await.unwrap();
        let analysis = pipeline.analyze(result).await.unwrap();

        assert_eq!(pipeline.export(&analysis).await.unwrap(), None);
        assert!(storage.files.lock().await.is_empty());
    }

    #[test]
    fn test_new_rejects_bad_scenarios() {
        assert!(matches!(
            SimulationPipeline::new(MockStorage::default(), config("Select an option", 10, 5, false)),
            Err(SimError::UnknownProfile { .. })
        ));
        assert!(matches!(
            SimulationPipeline::new(MockStorage::default(), config("roundabout", 0, 5, false)),
            Err(SimError::InvalidInput { .. })
        ));
    }
}
