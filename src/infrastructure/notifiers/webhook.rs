use async_trait::async_trait;

use crate::config::notifiers_config::{WebhookConfig, WebhookFormat};
use crate::domain::alert::Alert;
use crate::domain::ports::Notifier;
use crate::domain::template::NotificationTemplate;

const DISCORD_DESCRIPTION_LIMIT: usize = 4000;
const SLACK_SUMMARY_LIMIT: usize = 1000;

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        text.chars().take(limit).collect()
    } else {
        text.to_string()
    }
}

/// Generic outbound webhook rendering either a Discord embed, a Slack
/// blocks payload, or the raw alert JSON, grounded on the original
/// WebhookNotifier's format-selected dispatch.
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn render_discord(&self, alert: &Alert, template: &NotificationTemplate) -> serde_json::Value {
        serde_json::json!({
            "embeds": [{
                "title": template.title,
                "description": truncate_chars(&template.body, DISCORD_DESCRIPTION_LIMIT),
                "color": template.level.discord_color(),
                "url": alert.url,
                "fields": template.fields.iter().map(|(k, v)| serde_json::json!({"name": k, "value": v, "inline": true})).collect::<Vec<_>>(),
            }]
        })
    }

    fn render_slack(&self, alert: &Alert, template: &NotificationTemplate) -> serde_json::Value {
        let summary = truncate_chars(&template.body, SLACK_SUMMARY_LIMIT);
        serde_json::json!({
            "blocks": [
                {"type": "header", "text": {"type": "plain_text", "text": template.title}},
                {"type": "section", "text": {"type": "mrkdwn", "text": summary}},
                {"type": "context", "elements": [{"type": "mrkdwn", "text": format!("<{}|{}>", alert.url, alert.source)}]},
            ]
        })
    }

    fn render_json(&self, alert: &Alert) -> serde_json::Value {
        serde_json::to_value(alert).unwrap_or(serde_json::Value::Null)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &str {
        "webhook"
    }

    async fn send(&self, alert: &Alert, template: &NotificationTemplate) -> anyhow::Result<()> {
        let Some(url) = &self.config.url else {
            anyhow::bail!("webhook notifier is not configured");
        };

        let payload = match self.config.format {
            WebhookFormat::Discord => self.render_discord(alert, template),
            WebhookFormat::Slack => self.render_slack(alert, template),
            WebhookFormat::Json => self.render_json(alert),
        };

        let resp = self.client.post(url).json(&payload).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("webhook responded with {}", resp.status());
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

    fn alert() -> Alert {
        Alert {
            id: "x".to_string(),
            kind: AlertKind::Filing8K,
            priority: Priority::High,
            ticker: None,
            company: "Acme".to_string(),
            title: "t".to_string(),
            summary: "s".repeat(5000),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[test]
    fn discord_description_truncated_to_4000_chars() {
        let notifier = WebhookNotifier::new(WebhookConfig::default());
        let template = NotificationTemplate {
            title: "t".to_string(),
            body: "x".repeat(5000),
            level: Level::Critical,
            link: None,
            link_label: None,
            fields: vec![],
            channel_overrides: HashMap::new(),
        };
        let payload = notifier.render_discord(&alert(), &template);
        let description = payload["embeds"][0]["description"].as_str().unwrap();
        assert_eq!(description.chars().count(), DISCORD_DESCRIPTION_LIMIT);
    }

    #[test]
    fn slack_summary_truncated_to_1000_chars() {
        let notifier = WebhookNotifier::new(WebhookConfig::default());
        let template = NotificationTemplate {
            title: "t".to_string(),
            body: "x".repeat(2000),
            level: Level::Warning,
            link: None,
            link_label: None,
            fields: vec![],
            channel_overrides: HashMap::new(),
        };
        let payload = notifier.render_slack(&alert(), &template);
        let text = payload["blocks"][1]["text"]["text"].as_str().unwrap();
        assert_eq!(text.chars().count(), SLACK_SUMMARY_LIMIT);
    }
}
