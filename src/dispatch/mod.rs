//! Batched, paced delivery with per-recipient retry.
//!
//! Recipients are split into fixed-size batches and handled strictly in
//! order. Each recipient moves `Pending → Attempting → {Sent, Failed}`:
//! - status 200/201 ends the attempts as `Sent`
//! - any other status or a transport error is retried after a pause, up to
//!   the configured attempt count, then recorded as `Failed`
//!
//! Batches are separated by a fixed pause, skipped after the last batch.

mod backoff;
mod dispatcher;
mod pacer;

pub use backoff::{BackoffConfig, RetryBackoff};
pub use dispatcher::{DispatchConfig, Dispatcher, Notification, RunSummary, DRY_RUN_MESSAGE_ID};
pub use pacer::{Pacer, Pause, TokioPacer};
