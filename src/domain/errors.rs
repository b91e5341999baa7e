use thiserror::Error;

/// Errors surfaced while a collector is running. Per the pipeline's error
/// handling design, these are logged and the collector continues; they never
/// escape `Collector::produce` as a panic.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("transport error fetching {source}: {reason}")]
    Transport { source: String, reason: String },

    #[error("failed to parse entry from {source}: {reason}")]
    Parse { source: String, reason: String },

    #[error("websocket closed unexpectedly: {reason}")]
    SocketClosed { reason: String },

    #[error("collector {name} cannot start: {reason}")]
    StartupFailed { name: String, reason: String },
}

/// Errors raised delivering a rendered template to a channel.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("{channel} notifier request failed: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("{channel} notifier is not configured: {reason}")]
    NotConfigured { channel: String, reason: String },

    #[error("{channel} notifier timed out after {timeout_ms}ms")]
    Timeout { channel: String, timeout_ms: u64 },
}

/// Errors from rendering a NotificationTemplate into a channel payload.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("missing required field {field} while rendering {channel} template")]
    MissingField { channel: String, field: String },
}

/// Errors from an AI enrichment provider. Per spec these are always caught
/// and converted to `None` by the caller, never propagated to a notifier.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("{provider} enrichment missing credentials")]
    MissingCredentials { provider: String },

    #[error("{provider} enrichment request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} enrichment returned an unexpected response shape")]
    UnexpectedResponse { provider: String },
}

/// Errors from the ticker resolver's cache load / remote fetch.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("failed to read ticker cache at {path}: {reason}")]
    CacheRead { path: String, reason: String },

    #[error("failed to fetch ticker table from {url}: {reason}")]
    RemoteFetch { url: String, reason: String },

    #[error("failed to persist ticker cache at {path}: {reason}")]
    CacheWrite { path: String, reason: String },
}
