use crate::core::dispatcher::{DispatchConfig, DEFAULT_CONCURRENCY_LIMIT};
use crate::core::ConfigProvider;
use crate::service::DEFAULT_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "addr-verify")]
#[command(about = "Verify a CSV of postal addresses against the USPS Verify API")]
pub struct CliConfig {
    /// Input CSV: address1,address2,city,state,zip5,zip4
    #[arg(long, default_value = "test1.csv")]
    pub input: String,

    /// Treat the first input row as a header
    #[arg(long)]
    pub has_headers: bool,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    #[arg(long, default_value = "results.csv")]
    pub output_file: String,

    /// Endpoint prefix; the encoded request XML is appended to it
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// USPS Web Tools user id
    #[arg(long)]
    pub user_id: String,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    pub concurrency: usize,

    /// Log progress every N completed requests (0 disables)
    #[arg(long, default_value = "1000")]
    pub report_interval: usize,

    /// Delay after each successful request, in milliseconds
    #[arg(long, default_value = "1")]
    pub pacing_ms: u64,

    /// Per-request deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Disable progress output")]
    pub no_progress: bool,

    #[arg(long, help = "Also write summary.json next to the results")]
    pub summary: bool,

    #[arg(long, help = "Also write discarded.csv listing rows that produced no result")]
    pub discards: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn has_headers(&self) -> bool {
        self.has_headers
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn write_summary(&self) -> bool {
        self.summary
    }

    fn write_discards(&self) -> bool {
        self.discards
    }

    fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            concurrency_limit: self.concurrency,
            report_interval: self.report_interval,
            pacing_delay: Duration::from_millis(self.pacing_ms),
            call_timeout: self.timeout_secs.map(Duration::from_secs),
            progress: !self.no_progress,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("user_id", &self.user_id)?;
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_path("output_file", &self.output_file)?;
        validation::validate_positive_number("concurrency", self.concurrency, 1)?;
        validation::validate_range("concurrency", self.concurrency, 1, 1000)?;
        if let Some(timeout) = self.timeout_secs {
            validation::validate_range("timeout_secs", timeout, 1, 600)?;
        }
        Ok(())
    }
}
