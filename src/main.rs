use addr_verify::utils::error::{ErrorSeverity, VerifyError};
use addr_verify::utils::{logger, validation::Validate};
use addr_verify::{AddressPipeline, BatchEngine, CliConfig, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting addr-verify CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".");
    let pipeline = match AddressPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(e),
    };

    let engine = BatchEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Address verification completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(e),
    }

    Ok(())
}

fn fail(e: VerifyError) -> ! {
    tracing::error!(
        "❌ Address verification failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
