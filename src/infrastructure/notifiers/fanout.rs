use std::sync::Arc;

use crate::domain::alert::{Alert, Priority};
use crate::domain::ports::{AiEnricher, Notifier};
use crate::domain::template::{Level, NotificationTemplate};

/// Parallel multi-channel delivery. Renders one template, dispatches it to
/// every configured notifier concurrently, and returns once all have
/// completed regardless of individual failures — the Rust expression of the
/// original `MultiNotifier`'s `asyncio.gather(..., return_exceptions=True)`.
pub struct NotifierFanout {
    notifiers: Vec<Arc<dyn Notifier>>,
    ai_enricher: Option<Arc<dyn AiEnricher>>,
    min_priority: Priority,
}

impl NotifierFanout {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>, ai_enricher: Option<Arc<dyn AiEnricher>>, min_priority: Priority) -> Self {
        Self { notifiers, ai_enricher, min_priority }
    }

    pub fn build_template(alert: &Alert) -> NotificationTemplate {
        let level = Level::from_priority(alert.priority);
        let fields = vec![
            ("Company".to_string(), alert.company.clone()),
            ("Source".to_string(), alert.source.clone()),
            (
                "Ticker".to_string(),
                alert.ticker.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];
        NotificationTemplate {
            title: alert.title.clone(),
            body: alert.summary.clone(),
            level,
            link: Some(alert.url.clone()),
            link_label: Some(alert.source.clone()),
            fields,
            channel_overrides: std::collections::HashMap::new(),
        }
    }

    pub async fn send(&self, mut alert: Alert) {
        if alert.priority < self.min_priority {
            return;
        }

        if let Some(enricher) = &self.ai_enricher {
            if let Some(analysis) = enricher.analyze(&alert).await {
                alert.set_ai_analysis(analysis);
            }
        }

        let template = Self::build_template(&alert);
        let alert = Arc::new(alert);

        let sends = self.notifiers.iter().map(|notifier| {
            let notifier = Arc::clone(notifier);
            let alert = Arc::clone(&alert);
            let template = template.clone();
            async move {
                let result = notifier.send(&alert, &template).await;
                (notifier.channel().to_string(), result)
            }
        });

        let results = futures::future::join_all(sends).await;
        let mut success_count = 0;
        for (channel, result) in results {
            match result {
                Ok(()) => success_count += 1,
                Err(e) => tracing::warn!(channel = %channel, error = %e, "notifier delivery failed"),
            }
        }
        tracing::debug!(success_count, total = self.notifiers.len(), "fanout complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::AlertKind;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        channel: &'static str,
        fails: bool,
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        fn channel(&self) -> &str {
            self.channel
        }

        async fn send(&self, _alert: &Alert, _template: &NotificationTemplate) -> anyhow::Result<()> {
            self.count.fetch_add(1, Ordering::SeqCst);
            if self.fails {
                anyhow::bail!("simulated failure");
            }
            Ok(())
        }
    }

    fn alert() -> Alert {
        Alert {
            id: "x".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::High,
            ticker: None,
            company: "Acme".to_string(),
            title: "t".to_string(),
            summary: "s".to_string(),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[tokio::test]
    async fn one_notifier_failing_does_not_prevent_the_others_from_being_invoked() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));
        let count_c = Arc::new(AtomicUsize::new(0));

        let notifiers: Vec<Arc<dyn Notifier>> = vec![
            Arc::new(CountingNotifier { channel: "a", fails: false, count: Arc::clone(&count_a) }),
            Arc::new(CountingNotifier { channel: "b", fails: true, count: Arc::clone(&count_b) }),
            Arc::new(CountingNotifier { channel: "c", fails: false, count: Arc::clone(&count_c) }),
        ];

        let fanout = NotifierFanout::new(notifiers, None, Priority::Low);
        fanout.send(alert()).await;

        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
        assert_eq!(count_c.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn alert_below_min_priority_is_not_dispatched() {
        let count = Arc::new(AtomicUsize::new(0));
        let notifiers: Vec<Arc<dyn Notifier>> =
            vec![Arc::new(CountingNotifier { channel: "a", fails: false, count: Arc::clone(&count) })];
        let fanout = NotifierFanout::new(notifiers, None, Priority::High);

        let mut low = alert();
        low.priority = Priority::Low;
        fanout.send(low).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
