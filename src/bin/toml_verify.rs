use addr_verify::app::pipelines::address_pipeline::parse_addresses;
use addr_verify::core::ConfigProvider;
use addr_verify::utils::{logger, validation::Validate};
use addr_verify::{AddressPipeline, BatchEngine, LocalStorage, TomlConfig};
use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-verify")]
#[command(about = "Address verification driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "addr-verify.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the concurrency limit from the config
    #[arg(long)]
    concurrency: Option<usize>,

    /// Show what would be processed without calling the service
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    let verbose = args.verbose || config.logging.verbose;
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(concurrency) = args.concurrency {
        config.dispatch.concurrency_limit = Some(concurrency);
        tracing::info!("🔧 Concurrency limit overridden to: {}", concurrency);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let storage = LocalStorage::new(".");
    let pipeline = AddressPipeline::new(storage, config)?;
    let output_path = BatchEngine::new(pipeline).run().await?;

    println!("✅ Address verification completed successfully!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let dispatch = config.dispatch_config();

    println!("📋 Configuration Summary:");
    println!("  Service: {}", config.base_url());
    println!("  Input: {} (headers: {})", config.input_path(), config.has_headers());
    println!("  Output: {}/{}", config.output_dir(), config.output_file());
    println!("  Concurrency Limit: {}", dispatch.concurrency_limit);
    println!("  Report Interval: {}", dispatch.report_interval);
    println!("  Pacing Delay: {:?}", dispatch.pacing_delay);
    if let Some(timeout) = dispatch.call_timeout {
        println!("  Call Timeout: {:?}", timeout);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let data = tokio::fs::read(config.input_path())
        .await
        .with_context(|| format!("failed to read input '{}'", config.input_path()))?;
    let requests = parse_addresses(&data, config.has_headers())?;

    println!("🔍 {} addresses would be verified", requests.len());
    for request in requests.iter().take(5) {
        println!("  {}", request.to_record().join(","));
    }
    if requests.len() > 5 {
        println!("  ...");
    }
    Ok(())
}
