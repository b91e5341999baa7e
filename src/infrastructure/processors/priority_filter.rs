use async_trait::async_trait;

use crate::domain::alert::{Alert, Priority};
use crate::domain::ports::Processor;

/// Drops alerts below a configured minimum priority, and optionally those
/// whose catalysts don't intersect an allow-list. Pure and stable: same
/// (alert, config) always yields the same decision.
pub struct PriorityFilter {
    min_priority: Priority,
    catalyst_allow_list: Option<Vec<String>>,
}

impl PriorityFilter {
    pub fn new(min_priority: Priority) -> Self {
        Self { min_priority, catalyst_allow_list: None }
    }

    pub fn with_catalyst_allow_list(mut self, allow_list: Vec<String>) -> Self {
        self.catalyst_allow_list = Some(allow_list);
        self
    }
}

#[async_trait]
impl Processor for PriorityFilter {
    fn name(&self) -> &str {
        "priority_filter"
    }

    async fn process(&self, alert: Alert) -> anyhow::Result<Option<Alert>> {
        if alert.priority < self.min_priority {
            return Ok(None);
        }

        if let Some(allow_list) = &self.catalyst_allow_list {
            let catalysts = alert.catalysts();
            if catalysts.is_empty() || !catalysts.iter().any(|c| allow_list.contains(c)) {
                return Ok(None);
            }
        }

        Ok(Some(alert))
    }
}
