use async_trait::async_trait;

use crate::config::notifiers_config::RichCardConfig;
use crate::domain::alert::Alert;
use crate::domain::ports::Notifier;
use crate::domain::template::NotificationTemplate;

/// Colored interactive card with a header, body, key-value field list and an
/// action button to the source URL. Enriched from the original template
/// module's Slack "blocks" construction, generalized into a standalone card
/// schema since no single channel owns this shape.
pub struct RichCardNotifier {
    config: RichCardConfig,
    client: reqwest::Client,
}

impl RichCardNotifier {
    pub fn new(config: RichCardConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn render(&self, alert: &Alert, template: &NotificationTemplate) -> serde_json::Value {
        serde_json::json!({
            "card": {
                "header": {
                    "title": template.title,
                    "color": format!("#{:06x}", template.level.discord_color()),
                },
                "body": template.body,
                "fields": template.fields.iter().map(|(k, v)| serde_json::json!({"label": k, "value": v})).collect::<Vec<_>>(),
                "action": {
                    "label": template.link_label.clone().unwrap_or_else(|| "View source".to_string()),
                    "url": template.link.clone().unwrap_or_else(|| alert.url.clone()),
                },
            }
        })
    }
}

#[async_trait]
impl Notifier for RichCardNotifier {
    fn channel(&self) -> &str {
        "rich_card"
    }

    async fn send(&self, alert: &Alert, template: &NotificationTemplate) -> anyhow::Result<()> {
        let Some(url) = &self.config.webhook_url else {
            anyhow::bail!("rich card notifier is not configured");
        };

        let payload = self.render(alert, template);
        let resp = self.client.post(url).json(&payload).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("rich card webhook responded with {}", resp.status());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertKind, Priority};
    use crate::domain::template::Level;
    use chrono::Utc;
    use std::collections::HashMap;

    #[test]
    fn render_defaults_action_url_to_alert_url_when_no_link_set() {
        let notifier = RichCardNotifier::new(RichCardConfig::default());
        let alert = Alert {
            id: "x".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::High,
            ticker: None,
            company: "Acme".to_string(),
            title: "t".to_string(),
            summary: "s".to_string(),
            url: "https://example.com/filing".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        };
        let template = NotificationTemplate {
            title: "t".to_string(),
            body: "b".to_string(),
            level: Level::Critical,
            link: None,
            link_label: None,
            fields: vec![],
            channel_overrides: HashMap::new(),
        };
        let payload = notifier.render(&alert, &template);
        assert_eq!(payload["card"]["action"]["url"], "https://example.com/filing");
    }
}
