//! Background worker persisting click events off the redirect hot path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Retry policy for persisting one click event.
#[derive(Debug, Clone, Copy)]
pub struct ClickRetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
}

impl Default for ClickRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Drains the click channel, writing each event (ledger append + atomic
/// counter increment, one DB transaction) at-least-once.
///
/// Transient storage failures are retried with jittered exponential backoff
/// up to the policy's attempt budget; an exhausted budget drops the event
/// with an error log and a `clicks_failed_total` metric. Non-retryable
/// failures (e.g. the link vanished between resolve and persist) are dropped
/// immediately. Failures never propagate to the redirect response, which has
/// long since been sent.
///
/// The worker exits when every sender has been dropped, which is how the
/// server drains remaining events on shutdown.
pub async fn run_click_worker<R: ClickRepository>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    policy: ClickRetryPolicy,
) {
    while let Some(event) = rx.recv().await {
        persist_click(repository.as_ref(), event, policy).await;
    }

    tracing::info!("click worker stopped: channel closed");
}

async fn persist_click<R: ClickRepository>(
    repository: &R,
    event: ClickEvent,
    policy: ClickRetryPolicy,
) {
    let link_id = event.link_id;
    let new_click: NewClick = event.into();

    let strategy = ExponentialBackoff::from_millis(policy.base_delay.as_millis().max(1) as u64)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(policy.max_attempts.saturating_sub(1));

    let result = RetryIf::spawn(
        strategy,
        || repository.record(new_click.clone()),
        AppError::is_retryable,
    )
    .await;

    match result {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            tracing::debug!(link_id, click_id = click.id, "click persisted");
        }
        Err(e) if e.is_retryable() => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::error!(link_id, error = %e, "dropping click after retry budget exhausted");
        }
        Err(e) => {
            metrics::counter!("clicks_rejected_total").increment(1);
            tracing::warn!(link_id, error = %e, "dropping unpersistable click");
        }
    }
}
