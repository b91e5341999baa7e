use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::alert::Alert;
use crate::domain::ports::Processor;
use crate::domain::recency_cache::RecencyCache;

/// Chain-level deduplication, backed by a RecencyCache keyed on `Alert.id`.
/// Sits after per-collector dedup, so its window can be smaller; see
/// DESIGN.md for the capacity split rationale.
pub struct Dedup {
    seen: Mutex<RecencyCache<String>>,
}

impl Dedup {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: Mutex::new(RecencyCache::new(capacity)),
        }
    }
}

#[async_trait]
impl Processor for Dedup {
    fn name(&self) -> &str {
        "dedup"
    }

    async fn process(&self, alert: Alert) -> anyhow::Result<Option<Alert>> {
        let mut seen = self.seen.lock().await;
        if seen.add(alert.id.clone()) {
            Ok(Some(alert))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertKind, Priority};
    use chrono::Utc;
    use std::collections::HashMap;

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::Low,
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
    async fn second_occurrence_of_same_id_is_dropped() {
        let dedup = Dedup::new(10);
        let first = dedup.process(alert("a")).await.unwrap();
        let second = dedup.process(alert("a")).await.unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
    }
}
