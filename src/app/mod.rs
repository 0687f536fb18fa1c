//! One notification run, from settings to summary.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::delivery::{Transport, WebexClient};
use crate::dispatch::{Dispatcher, Notification, Pacer, RunSummary, TokioPacer};
use crate::error::{AppError, Result};
use crate::outcome::OutcomeLog;
use crate::recipients::load_recipients;
use crate::template::{build_fallback_text, load_template, render};

/// What a finished run reports back to the user
#[derive(Debug, Clone)]
pub struct RunReport {
    pub recipients: usize,
    pub summary: RunSummary,
    pub log_file: PathBuf,
}

/// Send the configured card to every recipient over the Webex API.
pub async fn run(settings: &Settings) -> Result<RunReport> {
    let token = settings.token()?;
    let client = WebexClient::new(token, settings.api_url.clone(), settings.request_timeout())?;

    run_with(settings, Arc::new(client), Arc::new(TokioPacer)).await
}

/// Same as [`run`] with an explicit transport and pacer.
///
/// Input, template and log problems are reported before the first send.
pub async fn run_with(
    settings: &Settings,
    transport: Arc<dyn Transport>,
    pacer: Arc<dyn Pacer>,
) -> Result<RunReport> {
    let recipients = load_recipients(&settings.csv)?;
    if recipients.is_empty() {
        return Err(AppError::NoRecipients(settings.csv.clone()));
    }
    tracing::info!(count = recipients.len(), "Loaded {} recipient(s).", recipients.len());

    let template = load_template(&settings.card_json)?;
    let card = render(&template, &settings.card_variables().to_map())?;
    let fallback_text = build_fallback_text(
        &settings.account,
        &settings.opportunity,
        &settings.amount,
        settings.due(),
    );
    let notification = Notification {
        card,
        fallback_text,
    };

    let dispatcher = Dispatcher::new(settings.dispatch_config(), transport, pacer);

    // Dropping the log on an early return still flushes it
    let mut log = OutcomeLog::open(&settings.log_file)?;
    let summary = dispatcher.run(&recipients, &notification, &mut log).await?;
    log.finish()?;

    tracing::info!(
        sent = summary.sent,
        failed = summary.failed,
        batches = summary.batches,
        "Run complete"
    );

    Ok(RunReport {
        recipients: recipients.len(),
        summary,
        log_file: settings.log_file.clone(),
    })
}
