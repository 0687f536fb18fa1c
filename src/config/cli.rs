use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Console log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Command-line flags. Every value flag overrides the settings file.
#[derive(Debug, Default, Parser)]
#[command(
    name = "card-notifier",
    about = "Bulk 1:1 Webex notifier with Adaptive Card (bot token)",
    version
)]
pub struct CliArgs {
    /// Path to settings JSON
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: PathBuf,

    /// Path to recipients CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Webex bot token (falls back to the settings file)
    #[arg(long, env = "WEBEX_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Messages per batch
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Seconds to pause between batches
    #[arg(long)]
    pub batch_delay: Option<f64>,

    /// Max attempts per recipient
    #[arg(long)]
    pub retry_count: Option<u32>,

    /// Seconds to wait between retries
    #[arg(long)]
    pub retry_delay: Option<f64>,

    /// CSV log output path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Account name to embed in the card
    #[arg(long)]
    pub account: Option<String>,

    /// Opportunity title/name
    #[arg(long)]
    pub opportunity: Option<String>,

    /// Opportunity amount/value
    #[arg(long)]
    pub amount: Option<String>,

    /// Due date string (e.g., 2025-10-01)
    #[arg(long)]
    pub due: Option<String>,

    /// URL for the primary CTA button
    #[arg(long)]
    pub cta_url: Option<String>,

    /// Path to Adaptive Card JSON template to send
    #[arg(long)]
    pub card_json: Option<PathBuf>,

    /// Webex create-message endpoint
    #[arg(long)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Print what would be sent, but don't call the API
    #[arg(long)]
    pub dry_run: bool,

    /// Console log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
