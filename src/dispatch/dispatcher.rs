use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::delivery::{OutboundMessage, Transport};
use crate::outcome::{DeliveryOutcome, OutcomeLogError, OutcomeSink, OutcomeStatus};
use crate::template::RenderedCard;

use super::backoff::{BackoffConfig, RetryBackoff};
use super::pacer::{Pacer, Pause};

/// Message id recorded for every recipient of a dry run
pub const DRY_RUN_MESSAGE_ID: &str = "(dry-run)";

/// Error bodies are cut to this many characters in the log
const ERROR_PREVIEW_CHARS: usize = 300;

/// Batching and retry settings for one run
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Recipients per batch
    pub batch_size: usize,
    /// Pause between batches
    pub batch_delay: Duration,
    /// Maximum attempts per recipient
    pub retry_count: u32,
    /// Pause between attempts
    pub retry_backoff: BackoffConfig,
    /// Skip the transport and report every recipient as sent
    pub dry_run: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay: Duration::from_secs(5),
            retry_count: 3,
            retry_backoff: BackoffConfig::default(),
            dry_run: false,
        }
    }
}

/// The card and its fallback text, shared by every recipient of a run.
#[derive(Debug, Clone)]
pub struct Notification {
    pub card: RenderedCard,
    pub fallback_text: String,
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub failed: usize,
    pub batches: usize,
}

/// Per-run state: the outcome sink and the running totals.
struct RunContext<'s, S: OutcomeSink + ?Sized> {
    sink: &'s mut S,
    summary: RunSummary,
}

impl<'s, S: OutcomeSink + ?Sized> RunContext<'s, S> {
    fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            summary: RunSummary::default(),
        }
    }

    fn record(&mut self, outcome: DeliveryOutcome) -> Result<(), OutcomeLogError> {
        match outcome.status {
            OutcomeStatus::Sent => self.summary.sent += 1,
            OutcomeStatus::Failed => self.summary.failed += 1,
        }
        self.sink.record(&outcome)
    }
}

/// Sends one notification to a list of recipients, batch by batch,
/// one recipient at a time.
pub struct Dispatcher {
    config: DispatchConfig,
    transport: Arc<dyn Transport>,
    pacer: Arc<dyn Pacer>,
}

impl Dispatcher {
    pub fn new(
        config: DispatchConfig,
        transport: Arc<dyn Transport>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            config,
            transport,
            pacer,
        }
    }

    /// Deliver `notification` to every recipient and record each outcome in
    /// `sink` as soon as it is known.
    ///
    /// Per-recipient failures only show up in the outcomes and the summary.
    /// The only error is a failure to record an outcome.
    #[tracing::instrument(
        name = "dispatcher.run",
        skip(self, recipients, notification, sink),
        fields(recipients = recipients.len())
    )]
    pub async fn run<S: OutcomeSink + ?Sized>(
        &self,
        recipients: &[String],
        notification: &Notification,
        sink: &mut S,
    ) -> Result<RunSummary, OutcomeLogError> {
        let batch_size = self.config.batch_size.max(1);
        let total = recipients.len();
        let mut ctx = RunContext::new(sink);

        if self.config.dry_run {
            tracing::debug!(
                card = %serde_json::to_string(&notification.card).unwrap_or_default(),
                "Dry run, card that would be sent"
            );
        }

        for (index, batch) in recipients.chunks(batch_size).enumerate() {
            let batch_index = index + 1;
            ctx.summary.batches = batch_index;
            tracing::info!(
                batch = batch_index,
                size = batch.len(),
                "=== Batch {}: sending {} message(s) ===",
                batch_index,
                batch.len()
            );

            for email in batch {
                let outcome = self.deliver(email, notification).await;
                ctx.record(outcome)?;
            }

            if batch_index * batch_size < total {
                tracing::info!(
                    batch = batch_index,
                    delay_secs = self.config.batch_delay.as_secs_f64(),
                    "Batch complete, pausing to respect rate limits"
                );
                self.pacer.pause(Pause::Batch, self.config.batch_delay).await;
            }
        }

        Ok(ctx.summary)
    }

    /// Attempt delivery to one recipient until it succeeds or attempts run out.
    #[tracing::instrument(name = "dispatcher.deliver", skip(self, notification))]
    async fn deliver(&self, email: &str, notification: &Notification) -> DeliveryOutcome {
        let retry_count = self.config.retry_count.max(1);
        let message = OutboundMessage::new(email, &notification.fallback_text, &notification.card);
        let mut backoff = RetryBackoff::new(self.config.retry_backoff.clone());

        let mut last_status = None;
        let mut error_preview = None;

        for attempt in 1..=retry_count {
            if self.config.dry_run {
                tracing::info!(email, attempt, "[DRY-RUN] {}", email);
                return sent(email, attempt, 200, DRY_RUN_MESSAGE_ID.to_string());
            }

            match self.transport.send(&message).await {
                Ok(response) if response.is_success() => {
                    let message_id = response.message_id().unwrap_or_default();
                    tracing::info!(email, attempt, id = %message_id, "[OK] {}", email);
                    return sent(email, attempt, response.status, message_id);
                }
                Ok(response) => {
                    let snippet = preview(&response.body);
                    tracing::warn!(
                        email,
                        attempt,
                        kind = "status",
                        status = response.status,
                        error = %snippet,
                        "Delivery attempt failed"
                    );
                    last_status = Some(response.status);
                    error_preview = Some(snippet);
                }
                Err(e) => {
                    let snippet = preview(&e.to_string());
                    tracing::warn!(
                        email,
                        attempt,
                        kind = "transport",
                        error = %snippet,
                        "Delivery attempt failed"
                    );
                    error_preview = Some(snippet);
                }
            }

            if attempt < retry_count {
                self.pacer.pause(Pause::Retry, backoff.next_delay()).await;
            }
        }

        tracing::error!(email, attempts = retry_count, "Giving up on recipient");
        DeliveryOutcome {
            timestamp: Utc::now(),
            email: email.to_string(),
            status: OutcomeStatus::Failed,
            attempts: retry_count,
            http_status: last_status,
            message_id: None,
            error_preview,
        }
    }
}

fn sent(email: &str, attempts: u32, http_status: u16, message_id: String) -> DeliveryOutcome {
    DeliveryOutcome {
        timestamp: Utc::now(),
        email: email.to_string(),
        status: OutcomeStatus::Sent,
        attempts,
        http_status: Some(http_status),
        message_id: Some(message_id),
        error_preview: None,
    }
}

/// First 300 characters of an error body, on one line.
fn preview(text: &str) -> String {
    text.chars()
        .take(ERROR_PREVIEW_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
