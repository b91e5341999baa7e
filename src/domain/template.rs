use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::alert::Priority;

/// Severity a notifier maps to channel-specific styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn from_priority(priority: Priority) -> Self {
        match priority {
            Priority::Low => Level::Info,
            Priority::Medium => Level::Warning,
            Priority::High => Level::Critical,
        }
    }

    /// Telegram-style priority emoji, per `AlertTemplate.format_telegram`.
    pub fn telegram_emoji(&self) -> &'static str {
        match self {
            Level::Critical | Level::Error => "\u{1F534}",
            Level::Warning => "\u{1F7E1}",
            _ => "\u{1F535}",
        }
    }

    /// Hex color used by the email template's colored header bar.
    pub fn email_color(&self) -> &'static str {
        match self {
            Level::Critical | Level::Error => "#dc2626",
            Level::Warning => "#f59e0b",
            _ => "#3b82f6",
        }
    }

    /// Discord embed color, decimal RGB.
    pub fn discord_color(&self) -> u32 {
        match self {
            Level::Critical | Level::Error => 16_711_680,
            Level::Warning => 15_105_570,
            Level::Success => 3_066_993,
            Level::Info => 3_447_003,
        }
    }
}

/// Channel-agnostic intermediate notification form. Each notifier renders
/// this into its native payload; rendering is deterministic given the same
/// template and config.
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
    pub level: Level,
    pub link: Option<String>,
    pub link_label: Option<String>,
    pub fields: Vec<(String, String)>,
    /// Per-channel override values (e.g. a notifier-specific field name or
    /// value) keyed by channel name; empty when no alert-specific override
    /// applies. Channels consult this before falling back to their defaults.
    pub channel_overrides: HashMap<String, serde_json::Value>,
}

impl NotificationTemplate {
    /// Maps a classified catalyst key to the short label used across all templates.
    pub fn catalyst_label(catalyst: &str) -> &'static str {
        match catalyst {
            "merger_acquisition" => "M&A",
            "fda_catalyst" => "FDA",
            "offering_dilution" => "Offering",
            "contract_partnership" => "Partnership",
            "insider_activity" => "Insider",
            "bankruptcy_restructuring" => "Bankruptcy",
            _ => "Other",
        }
    }

    /// Looks up a channel-specific override, falling back to `None` when
    /// absent so callers can chain `.or(default)`.
    pub fn override_for(&self, channel: &str) -> Option<&serde_json::Value> {
        self.channel_overrides.get(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_priority_maps_high_to_critical() {
        assert_eq!(Level::from_priority(Priority::High), Level::Critical);
        assert_eq!(Level::from_priority(Priority::Low), Level::Info);
    }

    #[test]
    fn catalyst_label_known_and_unknown() {
        assert_eq!(NotificationTemplate::catalyst_label("merger_acquisition"), "M&A");
        assert_eq!(NotificationTemplate::catalyst_label("bogus"), "Other");
    }

    #[test]
    fn discord_color_matches_spec_values() {
        assert_eq!(Level::Critical.discord_color(), 16_711_680);
        assert_eq!(Level::Warning.discord_color(), 15_105_570);
    }
}
