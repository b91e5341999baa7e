use async_trait::async_trait;
use regex::RegexSet;

use crate::domain::alert::{Alert, Priority};
use crate::domain::ports::Processor;

const CATALYST_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "merger_acquisition",
        &[
            r"merger", r"acquisition", r"acquires?", r"acquired", r"buyout", r"tender offer",
            r"definitive agreement", r"going private", r"takeover",
        ],
    ),
    (
        "fda_catalyst",
        &[
            r"\bfda\b", r"pdufa", r"approval", r"clearance", r"phase [123]", r"clinical trial",
            r"\bnda\b", r"\bbla\b", r"\binda\b", r"breakthrough therapy",
        ],
    ),
    (
        "offering_dilution",
        &[
            r"offering", r"placement", r"dilution", r"shelf registration", r"s-3",
            r"securities act", r"prospectus", r"warrant",
        ],
    ),
    (
        "contract_partnership",
        &[
            r"contract", r"agreement", r"partnership", r"license", r"collaboration",
            r"alliance", r"distribution", r"supply agreement",
        ],
    ),
    (
        "insider_activity",
        &[
            r"form 4", r"insider", r"director", r"officer", r"purchase", r"acquisition of",
            r"open market",
        ],
    ),
    (
        "bankruptcy_restructuring",
        &[
            r"bankruptcy", r"chapter 11", r"chapter 7", r"restructuring", r"default",
            r"insolvency",
        ],
    ),
];

const NOISE_PATTERNS: &[&str] = &[
    r"routine.{0,20}filing",
    r"quarterly report",
    r"annual report",
    r"10-k",
    r"10-q",
    r"proxy statement",
];

struct Category {
    key: &'static str,
    set: RegexSet,
}

/// Classifies an alert's text into the six catalyst categories and upgrades
/// priority accordingly; optionally drops "noise" filings. Regex sets are
/// compiled once at construction, mirroring the original alert filter's
/// precompiled-pattern approach.
pub struct CatalystClassifier {
    categories: Vec<Category>,
    noise: RegexSet,
    filter_noise: bool,
}

impl CatalystClassifier {
    pub fn new(filter_noise: bool) -> Self {
        let categories = CATALYST_CATEGORIES
            .iter()
            .map(|(key, patterns)| Category {
                key,
                set: RegexSet::new(patterns.iter().map(|p| format!("(?i){p}"))).expect("valid catalyst patterns"),
            })
            .collect();
        let noise = RegexSet::new(NOISE_PATTERNS.iter().map(|p| format!("(?i){p}"))).expect("valid noise patterns");
        Self { categories, noise, filter_noise }
    }

    pub fn classify(&self, text: &str) -> Vec<&'static str> {
        self.categories
            .iter()
            .filter(|cat| cat.set.is_match(text))
            .map(|cat| cat.key)
            .collect()
    }

    fn is_noise(&self, text: &str) -> bool {
        self.noise.is_match(text)
    }
}

impl Default for CatalystClassifier {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Processor for CatalystClassifier {
    fn name(&self) -> &str {
        "catalyst_classifier"
    }

    async fn process(&self, mut alert: Alert) -> anyhow::Result<Option<Alert>> {
        let combined = format!("{} {}", alert.title, alert.summary).to_lowercase();

        if self.filter_noise && self.is_noise(&combined) {
            return Ok(None);
        }

        let catalysts = self.classify(&combined);
        if catalysts.is_empty() {
            return Ok(Some(alert));
        }

        alert
            .enrichment
            .insert("catalysts".to_string(), serde_json::json!(catalysts));

        let high_tier = ["merger_acquisition", "fda_catalyst", "bankruptcy_restructuring"];
        let medium_tier = ["contract_partnership", "insider_activity"];

        if catalysts.iter().any(|c| high_tier.contains(c)) {
            alert.priority = Priority::High;
        } else if catalysts.iter().any(|c| medium_tier.contains(c)) && alert.priority == Priority::Low {
            alert.priority = Priority::Medium;
        }

        Ok(Some(alert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::AlertKind;
    use chrono::Utc;
    use std::collections::HashMap;

    fn alert(title: &str, summary: &str) -> Alert {
        Alert {
            id: "x".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::Low,
            ticker: None,
            company: "Acme".to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[tokio::test]
    async fn merger_catalyst_upgrades_priority_to_high() {
        let classifier = CatalystClassifier::new(true);
        let out = classifier
            .process(alert("8-K", "definitive agreement to merge with Beta Inc"))
            .await
            .unwrap()
            .expect("not dropped");
        assert_eq!(out.priority, Priority::High);
        assert!(out.catalysts().contains(&"merger_acquisition".to_string()));
    }

    #[tokio::test]
    async fn noise_filing_is_dropped_when_filter_noise_enabled() {
        let classifier = CatalystClassifier::new(true);
        let out = classifier.process(alert("Quarterly Report", "")).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn contract_catalyst_upgrades_low_to_medium_only() {
        let classifier = CatalystClassifier::new(true);
        let out = classifier
            .process(alert("8-K", "entered into a supply agreement"))
            .await
            .unwrap()
            .expect("not dropped");
        assert_eq!(out.priority, Priority::Medium);
    }
}
