use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown traffic solution: {id}")]
    UnknownProfile { id: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SimError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        SimError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::InvalidInput { .. } | SimError::UnknownProfile { .. } => ErrorCategory::Input,
            SimError::MissingConfigError { .. } | SimError::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            SimError::ZipError(_)
            | SimError::CsvError(_)
            | SimError::IoError(_)
            | SimError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => match self {
                SimError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SimError::InvalidInput { field, .. } => {
                format!("Enter a positive number for '{}'", field)
            }
            SimError::UnknownProfile { .. } => format!(
                "Pick one of: {}",
                crate::core::catalog::all()
                    .iter()
                    .map(|p| p.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            SimError::MissingConfigError { field } => {
                format!("Add '{}' to the scenario file or pass it as a flag", field)
            }
            SimError::ConfigError { .. } => {
                "Check the scenario file syntax against sim-config.toml".to_string()
            }
            SimError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            SimError::ZipError(_) | SimError::CsvError(_) | SimError::SerializationError(_) => {
                "Re-run the simulation; the export could not be written".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SimError::InvalidInput { .. } => "Please enter positive numbers!".to_string(),
            SimError::UnknownProfile { .. } => "Please select a traffic solution!".to_string(),
            SimError::MissingConfigError { field } => {
                format!("The scenario is missing '{}'", field)
            }
            SimError::ConfigError { message } => format!("The scenario file is invalid: {}", message),
            other => format!("An error occurred: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
