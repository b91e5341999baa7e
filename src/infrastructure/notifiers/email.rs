use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::notifiers_config::EmailConfig;
use crate::domain::alert::Alert;
use crate::domain::ports::Notifier;
use crate::domain::template::NotificationTemplate;

/// SMTP notifier rendering a colored HTML template keyed by priority. Uses
/// lettre's async transport so the SMTP round-trip never blocks the pipeline
/// driver, the Rust-native equivalent of the original's executor-offloaded
/// blocking `smtplib` call.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn render_html(&self, alert: &Alert, template: &NotificationTemplate) -> String {
        let color = template.level.email_color();
        let mut fields_html = String::new();
        for (key, value) in &template.fields {
            fields_html.push_str(&format!("<tr><td><strong>{key}</strong></td><td>{value}</td></tr>"));
        }
        format!(
            "<div style=\"border-left:4px solid {color};padding:12px\">\
             <h2>{}</h2><p>{}</p><table>{fields_html}</table>\
             <p><a href=\"{}\">{}</a></p></div>",
            template.title, template.body, alert.url, alert.source
        )
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &str {
        "email"
    }

    async fn send(&self, alert: &Alert, template: &NotificationTemplate) -> anyhow::Result<()> {
        let Some(host) = &self.config.smtp_host else {
            anyhow::bail!("email notifier is not configured");
        };
        let Some(from) = &self.config.from_address else {
            anyhow::bail!("email notifier has no from address");
        };
        if self.config.to_addresses.is_empty() {
            anyhow::bail!("email notifier has no recipients");
        }

        let html = self.render_html(alert, template);
        let mut builder = Message::builder()
            .from(from.parse()?)
            .subject(template.title.clone());
        for to in &self.config.to_addresses {
            builder = builder.to(to.parse()?);
        }
        let message = builder.header(ContentType::TEXT_HTML).body(html)?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(self.config.smtp_port);
        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_pass) {
            transport_builder = transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let transport = transport_builder.build();

        transport.send(message).await?;
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
            kind: AlertKind::FdaApproval,
            priority: Priority::High,
            ticker: None,
            company: "Acme".to_string(),
            title: "Acme approved".to_string(),
            summary: "s".to_string(),
            url: "https://example.com".to_string(),
            source: "FDA".to_string(),
            timestamp: Utc::now(),
            enrichment: HashMap::new(),
            raw: None,
        }
    }

    #[test]
    fn render_html_uses_critical_red_for_high_priority() {
        let notifier = EmailNotifier::new(EmailConfig::default());
        let template = NotificationTemplate {
            title: "Acme approved".to_string(),
            body: "body".to_string(),
            level: Level::Critical,
            link: None,
            link_label: None,
            fields: vec![("Company".to_string(), "Acme".to_string())],
            channel_overrides: HashMap::new(),
        };
        let html = notifier.render_html(&alert(), &template);
        assert!(html.contains("#dc2626"));
        assert!(html.contains("Acme approved"));
    }
}
