use async_trait::async_trait;

use crate::domain::alert::Alert;
use crate::domain::ports::AiEnricher;

/// Deterministic, network-free enrichment mapping classified catalysts to a
/// short assessment block, grounded on the original `RuleBasedProvider`'s
/// exact per-catalyst text.
pub struct RuleBasedEnricher;

impl RuleBasedEnricher {
    pub fn new() -> Self {
        Self
    }

    fn assessment(catalyst: &str) -> Option<(&'static str, &'static str, &'static str)> {
        match catalyst {
            "merger_acquisition" => Some((
                "Potential premium if deal closes at announced terms.",
                "Regulatory or financing risk could delay or break the deal.",
                "Monitor merger arbitrage spread and antitrust commentary.",
            )),
            "fda_catalyst" => Some((
                "Regulatory clearance removes a major de-risking milestone.",
                "Label restrictions or post-marketing requirements could limit upside.",
                "Watch for payer/formulary coverage decisions next.",
            )),
            "offering_dilution" => Some((
                "Fresh capital extends the company's operating runway.",
                "Share count increase dilutes existing holders.",
                "Compare offering price to recent trading range.",
            )),
            "contract_partnership" => Some((
                "New partnership may open an incremental revenue channel.",
                "Contract terms and exclusivity scope are often undisclosed.",
                "Confirm whether the agreement is material to reported revenue.",
            )),
            "insider_activity" => Some((
                "Insider buying can signal management confidence.",
                "Insider selling is frequently plan-based and not predictive.",
                "Check Form 4 transaction codes before drawing conclusions.",
            )),
            "bankruptcy_restructuring" => Some((
                "Restructuring may preserve going-concern value for some stakeholders.",
                "Equity holders are typically subordinated in a reorganization.",
                "Review the proposed plan's treatment of existing equity.",
            )),
            _ => None,
        }
    }
}

impl Default for RuleBasedEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiEnricher for RuleBasedEnricher {
    fn name(&self) -> &str {
        "rule_based"
    }

    async fn analyze(&self, alert: &Alert) -> Option<String> {
        let catalysts = alert.catalysts();
        if catalysts.is_empty() {
            return None;
        }

        let mut bullish = Vec::new();
        let mut bearish = Vec::new();
        let mut risks = Vec::new();
        for catalyst in &catalysts {
            if let Some((bull, bear, risk)) = Self::assessment(catalyst) {
                bullish.push(bull);
                bearish.push(bear);
                risks.push(risk);
            }
        }
        if bullish.is_empty() {
            return None;
        }

        Some(format!(
            "Bullish: {}\nBearish: {}\nRisks: {}\n\nNot financial advice.",
            bullish.join(" "),
            bearish.join(" "),
            risks.join(" ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertKind, Priority};
    use chrono::Utc;
    use std::collections::HashMap;

    #[tokio::test]
    async fn no_catalysts_returns_none() {
        let enricher = RuleBasedEnricher::new();
        let alert = Alert {
            id: "x".to_string(),
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
        };
        assert!(enricher.analyze(&alert).await.is_none());
    }

    #[tokio::test]
    async fn merger_catalyst_yields_disclaimer_suffixed_assessment() {
        let enricher = RuleBasedEnricher::new();
        let mut alert = Alert {
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
        };
        alert.enrichment.insert("catalysts".to_string(), serde_json::json!(["merger_acquisition"]));
        let analysis = enricher.analyze(&alert).await.expect("catalysts present");
        assert!(analysis.contains("Not financial advice"));
    }
}
