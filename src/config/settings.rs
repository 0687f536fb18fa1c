use std::path::PathBuf;
use std::time::Duration;

use config::{Config, File, FileFormat};
use serde::Deserialize;

use super::cli::CliArgs;
use crate::dispatch::{BackoffConfig, DispatchConfig};
use crate::error::AppError;
use crate::template::CardVariables;

pub const DEFAULT_CSV: &str = "recipients.csv";
pub const DEFAULT_LOG_FILE: &str = "send_log.csv";
pub const DEFAULT_CARD_JSON: &str = "main.json";
pub const DEFAULT_ACCOUNT: &str = "ACME Corp";
pub const DEFAULT_OPPORTUNITY: &str = "New Sales Opportunity";
pub const DEFAULT_AMOUNT: &str = "$50,000";
pub const DEFAULT_CTA_URL: &str = "https://example.crm.com/opportunities/ABC123";

/// Merged run configuration.
///
/// Precedence: command-line flag, then settings file, then built-in default.
/// The token additionally honours `WEBEX_BOT_TOKEN` ahead of the settings
/// file and has no default.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Recipients CSV
    pub csv: PathBuf,
    /// Outcome log CSV
    pub log_file: PathBuf,
    /// Adaptive Card template
    pub card_json: PathBuf,

    pub batch_size: u64,
    /// Seconds between batches
    pub batch_delay: f64,
    pub retry_count: u32,
    /// Seconds between attempts for one recipient
    pub retry_delay: f64,
    /// Growth factor for the retry delay (1.0 keeps it fixed)
    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,
    /// Upper bound in seconds for a grown retry delay
    #[serde(default = "default_retry_max_delay")]
    pub retry_max_delay: f64,

    pub account: String,
    pub opportunity: String,
    pub amount: String,
    #[serde(default)]
    pub due: Option<String>,
    pub cta_url: String,

    #[serde(default)]
    pub token: Option<String>,
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout: f64,
    #[serde(default)]
    pub dry_run: bool,
}

/// Empty flag values fall through to the next layer.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn default_retry_multiplier() -> f64 {
    1.0
}

fn default_retry_max_delay() -> f64 {
    60.0
}

impl Settings {
    /// Load settings from the file named by `--settings` (optional) and
    /// apply command-line overrides.
    pub fn load(args: &CliArgs) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .set_default("csv", DEFAULT_CSV)?
            .set_default("log_file", DEFAULT_LOG_FILE)?
            .set_default("card_json", DEFAULT_CARD_JSON)?
            .set_default("batch_size", 10)?
            .set_default("batch_delay", 5.0)?
            .set_default("retry_count", 3)?
            .set_default("retry_delay", 5.0)?
            .set_default("account", DEFAULT_ACCOUNT)?
            .set_default("opportunity", DEFAULT_OPPORTUNITY)?
            .set_default("amount", DEFAULT_AMOUNT)?
            .set_default("cta_url", DEFAULT_CTA_URL)?
            .set_default("api_url", crate::delivery::DEFAULT_MESSAGES_URL)?
            .set_default("timeout", 30.0)?;

        if !args.settings.as_os_str().is_empty() {
            builder = builder.add_source(
                File::new(&args.settings.to_string_lossy(), FileFormat::Json).required(false),
            );
        }

        let path_override = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .filter(|p| !p.is_empty())
        };

        let mut settings: Settings = builder
            .set_override_option("csv", path_override(&args.csv))?
            .set_override_option("log_file", path_override(&args.log_file))?
            .set_override_option("card_json", path_override(&args.card_json))?
            .set_override_option("batch_size", args.batch_size.map(i64::from))?
            .set_override_option("batch_delay", args.batch_delay)?
            .set_override_option("retry_count", args.retry_count.map(i64::from))?
            .set_override_option("retry_delay", args.retry_delay)?
            .set_override_option("account", non_empty(&args.account))?
            .set_override_option("opportunity", non_empty(&args.opportunity))?
            .set_override_option("amount", non_empty(&args.amount))?
            .set_override_option("due", non_empty(&args.due))?
            .set_override_option("cta_url", non_empty(&args.cta_url))?
            .set_override_option("token", non_empty(&args.token))?
            .set_override_option("api_url", non_empty(&args.api_url))?
            .set_override_option("timeout", args.timeout)?
            .set_override_option("dry_run", args.dry_run.then_some(true))?
            .build()?
            .try_deserialize()?;

        settings.fill_blank_defaults();
        settings.validate()?;
        Ok(settings)
    }

    /// An empty string in the settings file counts as unset.
    fn fill_blank_defaults(&mut self) {
        for (path, default) in [
            (&mut self.csv, DEFAULT_CSV),
            (&mut self.log_file, DEFAULT_LOG_FILE),
            (&mut self.card_json, DEFAULT_CARD_JSON),
        ] {
            if path.as_os_str().is_empty() {
                *path = PathBuf::from(default);
            }
        }
        for (value, default) in [
            (&mut self.account, DEFAULT_ACCOUNT),
            (&mut self.opportunity, DEFAULT_OPPORTUNITY),
            (&mut self.amount, DEFAULT_AMOUNT),
            (&mut self.cta_url, DEFAULT_CTA_URL),
            (&mut self.api_url, crate::delivery::DEFAULT_MESSAGES_URL),
        ] {
            if value.is_empty() {
                *value = default.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.batch_size == 0 {
            return Err(AppError::Validation("batch_size must be at least 1".into()));
        }
        if self.retry_count == 0 {
            return Err(AppError::Validation("retry_count must be at least 1".into()));
        }
        for (name, secs) in [
            ("batch_delay", self.batch_delay),
            ("retry_delay", self.retry_delay),
            ("retry_max_delay", self.retry_max_delay),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(AppError::Validation(format!(
                    "{name} must be a non-negative number of seconds"
                )));
            }
        }
        if !self.retry_multiplier.is_finite() || self.retry_multiplier < 1.0 {
            return Err(AppError::Validation("retry_multiplier must be at least 1.0".into()));
        }
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(AppError::Validation("timeout must be a positive number of seconds".into()));
        }
        Ok(())
    }

    /// The bot token; never defaulted.
    pub fn token(&self) -> Result<&str, AppError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)
    }

    /// `due` with an empty value treated as absent.
    pub fn due(&self) -> Option<&str> {
        self.due.as_deref().filter(|d| !d.is_empty())
    }

    pub fn card_variables(&self) -> CardVariables {
        CardVariables {
            account: self.account.clone(),
            opportunity: self.opportunity.clone(),
            amount: self.amount.clone(),
            due: self.due().map(str::to_string),
            cta_url: self.cta_url.clone(),
        }
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        let retry_delay = Duration::from_secs_f64(self.retry_delay);
        DispatchConfig {
            batch_size: usize::try_from(self.batch_size).unwrap_or(usize::MAX),
            batch_delay: Duration::from_secs_f64(self.batch_delay),
            retry_count: self.retry_count,
            retry_backoff: BackoffConfig {
                initial_delay: retry_delay,
                max_delay: Duration::from_secs_f64(self.retry_max_delay).max(retry_delay),
                multiplier: self.retry_multiplier,
                jitter_factor: 0.0,
            },
            dry_run: self.dry_run,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}
