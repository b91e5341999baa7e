use async_trait::async_trait;

use crate::config::notifiers_config::ChatBotConfig;
use crate::domain::alert::Alert;
use crate::domain::ports::Notifier;
use crate::domain::template::NotificationTemplate;

/// Telegram-style bot notifier: renders markdown and POSTs to the bot's
/// `sendMessage` endpoint, grounded on the original TelegramNotifier.
pub struct ChatBotNotifier {
    config: ChatBotConfig,
    client: reqwest::Client,
}

impl ChatBotNotifier {
    pub fn new(config: ChatBotConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn render(&self, alert: &Alert, template: &NotificationTemplate) -> String {
        let emoji = template.level.telegram_emoji();
        let kind_emoji = alert.kind.emoji();
        let mut text = format!("{emoji}{kind_emoji} *{}*\n\n{}\n", template.title, template.body);

        let catalysts = alert.catalysts();
        if !catalysts.is_empty() {
            let labels: Vec<&str> = catalysts.iter().map(|c| NotificationTemplate::catalyst_label(c)).collect();
            text.push_str(&format!("\n_Catalysts: {}_\n", labels.join(", ")));
        }

        if let Some(analysis) = &alert.ai_analysis() {
            text.push_str(&format!("\n*AI Analysis:*\n{analysis}\n"));
        }

        text.push_str(&format!("\n[{}]({})\n{}", alert.source, alert.url, alert.timestamp.to_rfc3339()));
        text
    }
}

#[async_trait]
impl Notifier for ChatBotNotifier {
    fn channel(&self) -> &str {
        "chat_bot"
    }

    async fn send(&self, alert: &Alert, template: &NotificationTemplate) -> anyhow::Result<()> {
        let (Some(token), Some(chat_id)) = (&self.config.token, &self.config.chat_id) else {
            anyhow::bail!("chat bot notifier is not configured");
        };

        let url = format!("{}/bot{token}/sendMessage", self.config.api_base);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": self.render(alert, template),
            "parse_mode": "Markdown",
            "disable_web_page_preview": false,
        });

        let resp = self.client.post(&url).json(&payload).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("chat bot responded with {}", resp.status());
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
            ticker: Some("ACME".to_string()),
            company: "Acme".to_string(),
            title: "Acme merges with Beta".to_string(),
            summary: "s".to_string(),
            url: "https://example.com".to_string(),
            source: "SEC EDGAR".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[test]
    fn render_includes_emoji_title_and_source_link() {
        let notifier = ChatBotNotifier::new(ChatBotConfig::default());
        let template = NotificationTemplate {
            title: "Acme merges with Beta".to_string(),
            body: "body".to_string(),
            level: Level::Critical,
            link: None,
            link_label: None,
            fields: vec![],
            channel_overrides: HashMap::new(),
        };
        let rendered = notifier.render(&alert(), &template);
        assert!(rendered.contains("\u{1F534}"));
        assert!(rendered.contains("\u{1F4C4}"));
        assert!(rendered.contains("Acme merges with Beta"));
        assert!(rendered.contains("https://example.com"));
    }
}
