use crate::core::stepper::StepperConfig;
use crate::core::ConfigProvider;
use crate::domain::model::BoundingRegion;
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_positive_real, validate_range,
    validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: ScenarioSection,
    pub animation: Option<AnimationConfig>,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSection {
    pub name: Option<String>,
    pub profile: Option<String>,
    pub arrival_rate: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub peak_hour: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub speed: Option<f64>,
    pub base_delay_ms: Option<u64>,
    pub spawn_probability: Option<f64>,
    pub lane_offset: Option<f64>,
    pub ticks: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub export: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

const DEFAULT_OUTPUT_PATH: &str = "./output";

impl ScenarioConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SimError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ARRIVAL_RATE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SimError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let profile = validate_required_field("scenario.profile", &self.scenario.profile)?;
        crate::core::catalog::find(profile)?;

        let rate = validate_required_field("scenario.arrival_rate", &self.scenario.arrival_rate)?;
        validate_positive_number("scenario.arrival_rate", (*rate).into(), 1)?;

        let duration =
            validate_required_field("scenario.duration_minutes", &self.scenario.duration_minutes)?;
        validate_positive_number("scenario.duration_minutes", (*duration).into(), 1)?;

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
        }

        if let Some(animation) = &self.animation {
            if let Some(speed) = animation.speed {
                validate_positive_real("animation.speed", speed)?;
            }
            if let Some(p) = animation.spawn_probability {
                validate_range("animation.spawn_probability", p, 0.0, 1.0)?;
            }
            self.stepper_config().validate()?;
            let region = self.region();
            validate_positive_real("animation.width", region.width)?;
            validate_positive_real("animation.height", region.height)?;
        }

        if let Some(format) = self.log_format() {
            if !["json", "compact"].contains(&format) {
                return Err(SimError::invalid_input(
                    "monitoring.log_format",
                    format,
                    "Supported formats: json, compact",
                ));
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_format.as_deref())
    }

    pub fn region(&self) -> BoundingRegion {
        let animation = self.animation.as_ref();
        BoundingRegion::new(
            animation.and_then(|a| a.width).unwrap_or(600.0),
            animation.and_then(|a| a.height).unwrap_or(300.0),
        )
    }

    pub fn stepper_config(&self) -> StepperConfig {
        let defaults = StepperConfig::default();
        let Some(animation) = &self.animation else {
            return defaults;
        };
        StepperConfig {
            spawn_probability: animation
                .spawn_probability
                .unwrap_or(defaults.spawn_probability),
            lane_offset: animation.lane_offset.unwrap_or(defaults.lane_offset),
            base_delay: animation
                .base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            ..defaults
        }
    }

    pub fn animation_speed(&self) -> f64 {
        self.animation.as_ref().and_then(|a| a.speed).unwrap_or(1.0)
    }

    pub fn animation_ticks(&self) -> u64 {
        self.animation.as_ref().and_then(|a| a.ticks).unwrap_or(100)
    }
}

impl ConfigProvider for ScenarioConfig {
    fn profile_id(&self) -> &str {
        self.scenario.profile.as_deref().unwrap_or_default()
    }

    fn arrival_rate(&self) -> u32 {
        self.scenario.arrival_rate.unwrap_or(0)
    }

    fn duration_minutes(&self) -> u32 {
        self.scenario.duration_minutes.unwrap_or(0)
    }

    fn peak_hour(&self) -> bool {
        self.scenario.peak_hour.unwrap_or(false)
    }

    fn seed(&self) -> Option<u64> {
        self.scenario.seed
    }

    fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .map(|o| o.path.as_str())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn export_enabled(&self) -> bool {
        self.output
            .as_ref()
            .map(|o| o.export.unwrap_or(true))
            .unwrap_or(false)
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
