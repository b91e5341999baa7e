pub mod catalyst_classifier;
pub mod dedup;
pub mod priority_filter;

pub use catalyst_classifier::CatalystClassifier;
pub use dedup::Dedup;
pub use priority_filter::PriorityFilter;

use crate::domain::alert::Alert;
use crate::domain::ports::Processor;

/// Ordered sequence of processors applied left-to-right; a drop by any
/// processor short-circuits the remaining chain.
pub struct ProcessorChain {
    steps: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    pub fn new(steps: Vec<Box<dyn Processor>>) -> Self {
        Self { steps }
    }

    pub async fn run(&self, mut alert: Alert) -> anyhow::Result<Option<Alert>> {
        alert.truncate_summary();
        for step in &self.steps {
            match step.process(alert).await {
                Ok(Some(next)) => alert = next,
                Ok(None) => return Ok(None),
                Err(e) => {
                    tracing::error!(processor = step.name(), error = %e, "processor failed, dropping alert");
                    return Ok(None);
                }
            }
        }
        Ok(Some(alert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertKind, Priority};
    use chrono::Utc;
    use std::collections::HashMap;

    fn alert() -> Alert {
        Alert {
            id: "chain-1".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::Low,
            ticker: None,
            company: "Acme".to_string(),
            title: "merger agreement".to_string(),
            summary: "definitive agreement to merge".to_string(),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[tokio::test]
    async fn chain_classifies_then_filters() {
        let chain = ProcessorChain::new(vec![
            Box::new(Dedup::new(10)),
            Box::new(CatalystClassifier::new(true)),
            Box::new(PriorityFilter::new(Priority::High)),
        ]);
        let result = chain.run(alert()).await.unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().priority, Priority::High);
    }

    #[tokio::test]
    async fn duplicate_id_is_dropped_before_classification() {
        let chain = ProcessorChain::new(vec![
            Box::new(Dedup::new(10)),
            Box::new(CatalystClassifier::new(true)),
            Box::new(PriorityFilter::new(Priority::Low)),
        ]);
        assert!(chain.run(alert()).await.unwrap().is_some());
        assert!(chain.run(alert()).await.unwrap().is_none());
    }
}
