//! Notifier configuration parsing from environment variables.
//!
//! Each notifier is present only when its required fields are set; the
//! engine decides at startup which notifiers to build from these configs.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct ChatBotConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

impl ChatBotConfig {
    pub fn from_env() -> Self {
        Self {
            token: env::var("DUETTO_CHAT_BOT__TOKEN").ok().filter(|v| !v.is_empty()),
            chat_id: env::var("DUETTO_CHAT_BOT__CHAT_ID").ok().filter(|v| !v.is_empty()),
            api_base: env::var("DUETTO_CHAT_BOT__API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub from_address: Option<String>,
    pub to_addresses: Vec<String>,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            smtp_host: env::var("DUETTO_EMAIL__SMTP_HOST").ok().filter(|v| !v.is_empty()),
            smtp_port: env::var("DUETTO_EMAIL__SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("DUETTO_EMAIL__SMTP_USER").ok().filter(|v| !v.is_empty()),
            smtp_pass: env::var("DUETTO_EMAIL__SMTP_PASS").ok().filter(|v| !v.is_empty()),
            from_address: env::var("DUETTO_EMAIL__FROM").ok().filter(|v| !v.is_empty()),
            to_addresses: env::var("DUETTO_EMAIL__TO")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.smtp_host.is_some() && self.from_address.is_some() && !self.to_addresses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookFormat {
    Discord,
    Slack,
    Json,
}

impl WebhookFormat {
    fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "discord" => WebhookFormat::Discord,
            "slack" => WebhookFormat::Slack,
            _ => WebhookFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub format: WebhookFormat,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { url: None, format: WebhookFormat::Json }
    }
}

impl WebhookConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DUETTO_WEBHOOK__URL").ok().filter(|v| !v.is_empty()),
            format: WebhookFormat::from_str(&env::var("DUETTO_WEBHOOK__FORMAT").unwrap_or_else(|_| "json".to_string())),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RichCardConfig {
    pub webhook_url: Option<String>,
}

impl RichCardConfig {
    pub fn from_env() -> Self {
        Self {
            webhook_url: env::var("DUETTO_RICH_CARD__WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

/// Aggregated notifier configuration.
#[derive(Debug, Clone, Default)]
pub struct NotifiersEnvConfig {
    pub chat_bot: ChatBotConfig,
    pub email: EmailConfig,
    pub webhook: WebhookConfig,
    pub rich_card: RichCardConfig,
}

impl NotifiersEnvConfig {
    pub fn from_env() -> Self {
        Self {
            chat_bot: ChatBotConfig::from_env(),
            email: EmailConfig::from_env(),
            webhook: WebhookConfig::from_env(),
            rich_card: RichCardConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chatbot_unconfigured_without_token_and_chat_id() {
        let config = ChatBotConfig::default();
        assert!(!config.is_configured());
    }

    #[test]
    fn webhook_default_format_is_json() {
        let config = WebhookConfig::default();
        assert_eq!(config.format, WebhookFormat::Json);
    }

    #[test]
    fn email_requires_host_from_and_recipients() {
        let config = EmailConfig::default();
        assert!(!config.is_configured());
    }
}
