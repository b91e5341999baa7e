use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered priority: `Low < Medium < High`. Derived order matches declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Filing8K,
    FilingS3,
    Form4,
    Filing6K,
    FdaApproval,
    FdaPdufa,
    FdaTrial,
    PressRelease,
    PriceMove,
}

impl AlertKind {
    /// Short human label used by chat/card notifiers for a kind-specific emoji-free prefix.
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Filing8K => "8-K",
            AlertKind::FilingS3 => "S-3",
            AlertKind::Form4 => "Form 4",
            AlertKind::Filing6K => "6-K",
            AlertKind::FdaApproval => "FDA Approval",
            AlertKind::FdaPdufa => "FDA PDUFA",
            AlertKind::FdaTrial => "FDA Trial",
            AlertKind::PressRelease => "Press Release",
            AlertKind::PriceMove => "Price Move",
        }
    }

    /// Kind-specific emoji, used by notifiers alongside the priority emoji.
    pub fn emoji(&self) -> &'static str {
        match self {
            AlertKind::Filing8K | AlertKind::FilingS3 | AlertKind::Filing6K => "\u{1F4C4}",
            AlertKind::Form4 => "\u{1F464}",
            AlertKind::FdaApproval | AlertKind::FdaPdufa | AlertKind::FdaTrial => "\u{1F48A}",
            AlertKind::PressRelease => "\u{1F4E2}",
            AlertKind::PriceMove => "\u{1F4C8}",
        }
    }
}

/// The pipeline's currency: a single normalized market event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub priority: Priority,
    pub ticker: Option<String>,
    pub company: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub enrichment: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Alert {
    const MAX_SUMMARY_LEN: usize = 500;

    /// Trims `summary` to the spec's 500-char ceiling, on char boundaries.
    pub fn truncate_summary(&mut self) {
        if self.summary.chars().count() > Self::MAX_SUMMARY_LEN {
            self.summary = self.summary.chars().take(Self::MAX_SUMMARY_LEN).collect();
        }
    }

    pub fn catalysts(&self) -> Vec<String> {
        match self.enrichment.get("catalysts") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn ai_analysis(&self) -> Option<String> {
        self.enrichment
            .get("ai_analysis")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    pub fn set_ai_analysis(&mut self, text: String) {
        self.enrichment
            .insert("ai_analysis".to_string(), serde_json::Value::String(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Alert {
        Alert {
            id: "abc123".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::Low,
            ticker: Some("ACME".to_string()),
            company: "Acme Corp".to_string(),
            title: "8-K filed".to_string(),
            summary: "x".repeat(600),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[test]
    fn priority_orders_low_medium_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn summary_is_truncated_to_500_chars() {
        let mut alert = sample();
        alert.truncate_summary();
        assert_eq!(alert.summary.chars().count(), 500);
    }

    #[test]
    fn catalysts_roundtrip_through_enrichment() {
        let mut alert = sample();
        alert.enrichment.insert(
            "catalysts".to_string(),
            serde_json::json!(["merger_acquisition", "fda_catalyst"]),
        );
        assert_eq!(
            alert.catalysts(),
            vec!["merger_acquisition".to_string(), "fda_catalyst".to_string()]
        );
    }
}
