use crate::core::dispatcher::{
    DispatchConfig, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_PACING_DELAY, DEFAULT_REPORT_INTERVAL,
};
use crate::core::ConfigProvider;
use crate::service::DEFAULT_BASE_URL;
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub dispatch: DispatchSection,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub user_id: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchSection {
    pub concurrency_limit: Option<usize>,
    pub report_interval: Option<usize>,
    pub pacing_delay_ms: Option<u64>,
    pub progress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: String,
    #[serde(default)]
    pub has_headers: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            has_headers: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
    #[serde(default = "default_output_file")]
    pub file: String,
    #[serde(default)]
    pub summary: bool,
    #[serde(default)]
    pub discards: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file: default_output_file(),
            summary: false,
            discards: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `compact` (default) or `json`.
    pub format: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_input_path() -> String {
    "test1.csv".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_output_file() -> String {
    "results.csv".to_string()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VerifyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VerifyError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .format
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.service.base_url
    }

    fn user_id(&self) -> &str {
        &self.service.user_id
    }

    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn has_headers(&self) -> bool {
        self.input.has_headers
    }

    fn output_dir(&self) -> &str {
        &self.output.directory
    }

    fn output_file(&self) -> &str {
        &self.output.file
    }

    fn write_summary(&self) -> bool {
        self.output.summary
    }

    fn write_discards(&self) -> bool {
        self.output.discards
    }

    fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            concurrency_limit: self
                .dispatch
                .concurrency_limit
                .unwrap_or(DEFAULT_CONCURRENCY_LIMIT),
            report_interval: self
                .dispatch
                .report_interval
                .unwrap_or(DEFAULT_REPORT_INTERVAL),
            pacing_delay: self
                .dispatch
                .pacing_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PACING_DELAY),
            call_timeout: self.service.timeout_seconds.map(Duration::from_secs),
            progress: self.dispatch.progress.unwrap_or(true),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("service.base_url", &self.service.base_url)?;
        validation::validate_no_placeholder("service.user_id", &self.service.user_id)?;
        validation::validate_non_empty_string("service.user_id", &self.service.user_id)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_path("output.directory", &self.output.directory)?;
        validation::validate_path("output.file", &self.output.file)?;

        if let Some(limit) = self.dispatch.concurrency_limit {
            validation::validate_positive_number("dispatch.concurrency_limit", limit, 1)?;
            validation::validate_range("dispatch.concurrency_limit", limit, 1, 1000)?;
        }
        if let Some(timeout) = self.service.timeout_seconds {
            validation::validate_range("service.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(format) = &self.logging.format {
            if !["json", "compact"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(VerifyError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: "Valid formats: json, compact".to_string(),
                });
            }
        }

        Ok(())
    }
}
