use std::time::Duration;

use async_trait::async_trait;

/// Why the dispatcher is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Between two attempts for the same recipient
    Retry,
    /// Between two batches
    Batch,
}

/// Blocks the dispatch loop for a pause. Nothing else runs meanwhile.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, kind: Pause, duration: Duration);
}

/// Pacer backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, kind: Pause, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::trace!(?kind, ?duration, "Pausing");
        tokio::time::sleep(duration).await;
    }
}
