use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::alert::Alert;
use crate::domain::template::NotificationTemplate;

/// Contract shared by every alert source. `start`/`stop` are idempotent;
/// `produce` feeds alerts onto the returned channel until stopped or the
/// underlying source fails permanently. Transient failures are swallowed
/// internally and logged, never surfaced as a channel close.
#[async_trait]
pub trait Collector: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self) -> anyhow::Result<()>;

    async fn stop(&self) -> anyhow::Result<()>;

    /// Spawns the collector's background task(s) and returns the receiving
    /// end of its alert channel. Safe to call once per `start`.
    async fn produce(&self) -> anyhow::Result<mpsc::Receiver<Alert>>;
}

/// A single step in the ProcessorChain. `Ok(None)` means "drop this alert".
#[async_trait]
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    async fn process(&self, alert: Alert) -> anyhow::Result<Option<Alert>>;
}

/// A delivery channel. `send` renders the already-built template and
/// dispatches it; failures are returned, not panicked, so NotifierFanout can
/// continue with the remaining notifiers.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &str;

    async fn send(&self, alert: &Alert, template: &NotificationTemplate) -> anyhow::Result<()>;
}

/// Optional pre-notification enrichment step. Implementations must never
/// propagate an error to the caller: missing credentials or network failure
/// both resolve to `Ok(None)`.
#[async_trait]
pub trait AiEnricher: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, alert: &Alert) -> Option<String>;
}
