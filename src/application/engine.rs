use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::domain::ports::{AiEnricher, Collector, Notifier};
use crate::infrastructure::ai::{ChatApiV1Enricher, ChatApiV2Enricher, RuleBasedEnricher};
use crate::infrastructure::collectors::{ApprovalsScraper, FilingFeed, QuoteStream};
use crate::infrastructure::notifiers::{ChatBotNotifier, EmailNotifier, NotifierFanout, RichCardNotifier, WebhookNotifier};
use crate::infrastructure::processors::{CatalystClassifier, Dedup, PriorityFilter, ProcessorChain};
use crate::infrastructure::{BroadcastHub, TickerResolver};
use crate::config::ai_config::AiProviderKind;

const DRIVER_BACKOFF_CAP_SECS: u64 = 30;

/// Per-collector last-success timestamp and running state, exposed for the
/// HTTP status endpoint.
pub struct CollectorStatus {
    pub name: String,
    pub last_success: RwLock<Option<chrono::DateTime<chrono::Utc>>>,
}

/// Owns collectors, the processor chain, the broadcast hub and the notifier
/// fanout, and wires them together. Grounded on the teacher's
/// `Application::build`/`start` lifecycle plus the original alert engine's
/// declarative notifier/AI construction and per-collector driver tasks.
pub struct Engine {
    collectors: Vec<Arc<dyn Collector>>,
    chain: Arc<ProcessorChain>,
    pub hub: Arc<BroadcastHub>,
    fanout: Arc<NotifierFanout>,
    running: AtomicBool,
    driver_handles: RwLock<Vec<JoinHandle<()>>>,
    pub statuses: Vec<Arc<CollectorStatus>>,
}

impl Engine {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let resolver = Arc::new(TickerResolver::new());

        let mut collectors: Vec<Arc<dyn Collector>> = Vec::new();
        let mut statuses = Vec::new();

        if config.collectors.filing_feed.enabled {
            collectors.push(Arc::new(FilingFeed::new(config.collectors.filing_feed.clone(), Arc::clone(&resolver))));
            statuses.push(Arc::new(CollectorStatus { name: "filing_feed".to_string(), last_success: RwLock::new(None) }));
        }
        if config.collectors.approvals.enabled {
            collectors.push(Arc::new(ApprovalsScraper::new(config.collectors.approvals.clone())));
            statuses.push(Arc::new(CollectorStatus { name: "approvals_scraper".to_string(), last_success: RwLock::new(None) }));
        }
        if config.collectors.quote_stream.enabled {
            collectors.push(Arc::new(QuoteStream::new(config.collectors.quote_stream.clone())));
            statuses.push(Arc::new(CollectorStatus { name: "quote_stream".to_string(), last_success: RwLock::new(None) }));
        }

        let chain = Arc::new(ProcessorChain::new(vec![
            Box::new(Dedup::new(config.dedup_capacity)),
            Box::new(CatalystClassifier::new(true)),
            Box::new(PriorityFilter::new(config.notify_min_priority)),
        ]));

        let hub = Arc::new(BroadcastHub::new(config.recent_history_capacity));

        let notifiers = Self::build_notifiers(&config);
        let ai_enricher = Self::build_ai_enricher(&config);

        let fanout = Arc::new(NotifierFanout::new(notifiers, ai_enricher, config.notify_min_priority));

        Ok(Self {
            collectors,
            chain,
            hub,
            fanout,
            running: AtomicBool::new(false),
            driver_handles: RwLock::new(Vec::new()),
            statuses,
        })
    }

    fn build_notifiers(config: &Config) -> Vec<Arc<dyn Notifier>> {
        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

        if config.notifiers.chat_bot.is_configured() {
            tracing::info!("chat bot notifier initialized");
            notifiers.push(Arc::new(ChatBotNotifier::new(config.notifiers.chat_bot.clone())));
        }
        if config.notifiers.email.is_configured() {
            tracing::info!("email notifier initialized");
            notifiers.push(Arc::new(EmailNotifier::new(config.notifiers.email.clone())));
        }
        if config.notifiers.webhook.is_configured() {
            tracing::info!("webhook notifier initialized");
            notifiers.push(Arc::new(WebhookNotifier::new(config.notifiers.webhook.clone())));
        }
        if config.notifiers.rich_card.is_configured() {
            tracing::info!("rich card notifier initialized");
            notifiers.push(Arc::new(RichCardNotifier::new(config.notifiers.rich_card.clone())));
        }

        notifiers
    }

    fn build_ai_enricher(config: &Config) -> Option<Arc<dyn AiEnricher>> {
        if !config.ai.enabled {
            return None;
        }
        let enricher: Arc<dyn AiEnricher> = match config.ai.provider {
            AiProviderKind::ChatV1 if config.ai.api_key.is_some() => Arc::new(ChatApiV1Enricher::new(config.ai.clone())),
            AiProviderKind::ChatV2 if config.ai.api_key.is_some() => Arc::new(ChatApiV2Enricher::new(config.ai.clone())),
            _ => Arc::new(RuleBasedEnricher::new()),
        };
        Some(enricher)
    }

    /// Starts every collector and spawns one driver task per collector that
    /// feeds the processor chain, hub, and notifier fanout. A collector
    /// whose driver loop errors is restarted with exponential backoff
    /// without affecting the others.
    pub async fn start(&self) -> anyhow::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        let mut handles = Vec::new();

        for (collector, status) in self.collectors.iter().zip(self.statuses.iter()) {
            collector.start().await?;

            let collector = Arc::clone(collector);
            let status = Arc::clone(status);
            let chain = Arc::clone(&self.chain);
            let hub = Arc::clone(&self.hub);
            let fanout = Arc::clone(&self.fanout);
            let running = Arc::new(AtomicBool::new(true));

            let handle = tokio::spawn(async move {
                let mut backoff = Duration::from_secs(1);
                while running.load(Ordering::SeqCst) {
                    match collector.produce().await {
                        Ok(mut rx) => {
                            backoff = Duration::from_secs(1);
                            while let Some(alert) = rx.recv().await {
                                *status.last_success.write().await = Some(chrono::Utc::now());
                                if let Ok(Some(processed)) = chain.run(alert).await {
                                    hub.broadcast(processed.clone()).await;
                                    fanout.send(processed).await;
                                }
                            }
                            tracing::warn!(collector = collector.name(), "collector channel closed, restarting");
                        }
                        Err(e) => {
                            tracing::warn!(collector = collector.name(), error = %e, "collector failed to start producing");
                        }
                    }
                    tokio::time::sleep(backoff).await;
                    backoff = std::cmp::min(backoff * 2, Duration::from_secs(DRIVER_BACKOFF_CAP_SECS));
                }
            });
            handles.push(handle);
        }

        *self.driver_handles.write().await = handles;
        Ok(())
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        let handles = std::mem::take(&mut *self.driver_handles.write().await);
        for handle in handles {
            handle.abort();
        }
        for collector in self.collectors.iter().rev() {
            let _ = collector.stop().await;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn engine_builds_with_default_config() {
        let config = Config::from_env();
        let engine = Engine::build(config).await.expect("engine builds");
        assert!(!engine.is_running());
    }
}
