use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML encode error: {0}")]
    XmlEncodeError(#[from] quick_xml::SeError),

    #[error("XML decode error: {0}")]
    XmlDecodeError(#[from] quick_xml::DeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Output,
    Format,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VerifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VerifyError::ApiError(_) => ErrorCategory::Network,
            VerifyError::CsvError(_) => ErrorCategory::Input,
            VerifyError::IoError(_) => ErrorCategory::Output,
            VerifyError::SerializationError(_)
            | VerifyError::XmlEncodeError(_)
            | VerifyError::XmlDecodeError(_) => ErrorCategory::Format,
            VerifyError::ConfigError { .. }
            | VerifyError::MissingConfigError { .. }
            | VerifyError::InvalidConfigValueError { .. }
            | VerifyError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            VerifyError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input
            | ErrorCategory::Format
            | ErrorCategory::Configuration
            | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the service base URL",
            ErrorCategory::Input => {
                "Make sure the input file is a CSV with address1,address2,city,state,zip5,zip4 columns"
            }
            ErrorCategory::Output => "Check that the input exists and the output directory is writable",
            ErrorCategory::Format => "Inspect the service response or the offending row",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
            ErrorCategory::Processing => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            VerifyError::IoError(e) => format!("File access failed: {}", e),
            VerifyError::CsvError(e) => format!("Could not read the address list: {}", e),
            VerifyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            VerifyError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
