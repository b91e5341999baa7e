//! Environment-driven configuration, split by domain module the way the
//! teacher's broker/risk/observability configs are split, then aggregated
//! into one `Config`. Nested groups read `__`-delimited variable names where
//! a single flat name would collide (see each sub-module).

pub mod ai_config;
pub mod collectors_config;
pub mod notifiers_config;
pub mod server_config;

use ai_config::AiEnvConfig;
use collectors_config::CollectorsEnvConfig;
use notifiers_config::NotifiersEnvConfig;
use server_config::ServerEnvConfig;

use crate::domain::alert::Priority;

#[derive(Debug, Clone)]
pub struct Config {
    pub collectors: CollectorsEnvConfig,
    pub notifiers: NotifiersEnvConfig,
    pub ai: AiEnvConfig,
    pub server: ServerEnvConfig,
    pub notify_min_priority: Priority,
    pub recent_history_capacity: usize,
    pub dedup_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let notify_min_priority = std::env::var("DUETTO_NOTIFY_MIN_PRIORITY")
            .ok()
            .and_then(|v| Priority::from_str_loose(&v))
            .unwrap_or(Priority::Low);

        Self {
            collectors: CollectorsEnvConfig::from_env(),
            notifiers: NotifiersEnvConfig::from_env(),
            ai: AiEnvConfig::from_env(),
            server: ServerEnvConfig::from_env(),
            notify_min_priority,
            recent_history_capacity: std::env::var("DUETTO_RECENT_HISTORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            dedup_capacity: std::env::var("DUETTO_DEDUP_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_set_min_priority_low_and_history_capacity_100() {
        let config = Config::from_env();
        assert_eq!(config.notify_min_priority, Priority::Low);
        assert_eq!(config.recent_history_capacity, 100);
    }
}
