use anyhow::Result;
use clap::Parser;

use card_notifier::app;
use card_notifier::config::{CliArgs, Settings};
use card_notifier::telemetry::init_telemetry;

#[tokio::main]
async fn main() {
    if let Err(e) = try_main().await {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    // Load .env file if exists, so WEBEX_BOT_TOKEN can live there
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    init_telemetry(args.log_format)?;

    let settings = Settings::load(&args)?;
    tracing::debug!(settings = %args.settings.display(), "Configuration loaded");

    let report = app::run(&settings).await?;

    println!();
    println!("=== Summary ===");
    println!("Sent:   {}", report.summary.sent);
    println!("Failed: {}", report.summary.failed);
    println!("Log written to: {}", report.log_file.display());

    Ok(())
}
