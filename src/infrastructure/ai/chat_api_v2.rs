use async_trait::async_trait;

use crate::config::ai_config::AiEnvConfig;
use crate::domain::alert::Alert;
use crate::domain::ports::AiEnricher;
use crate::infrastructure::ai::prompt::{build_prompt, trim_response, SYSTEM_PROMPT};

/// Anthropic-style `messages` provider. Grounded on the original
/// `AnthropicProvider`: distinct auth header, `content[0].text` response
/// path, system prompt passed as a top-level field rather than a message.
pub struct ChatApiV2Enricher {
    config: AiEnvConfig,
    client: reqwest::Client,
}

impl ChatApiV2Enricher {
    pub fn new(config: AiEnvConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl AiEnricher for ChatApiV2Enricher {
    fn name(&self) -> &str {
        "chat_v2"
    }

    async fn analyze(&self, alert: &Alert) -> Option<String> {
        let api_key = self.config.api_key.as_ref()?;

        let payload = serde_json::json!({
            "model": self.config.model,
            "system": SYSTEM_PROMPT,
            "messages": [
                {"role": "user", "content": build_prompt(alert)},
            ],
            "temperature": 0.3,
            "max_tokens": 300,
        });

        let url = format!("{}/messages", self.config.base_url);
        let resp = match self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "chat_v2 enrichment request failed");
                return None;
            }
        };

        let body: serde_json::Value = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "chat_v2 enrichment response was not valid JSON");
                return None;
            }
        };

        body.get("content")?.get(0)?.get("text")?.as_str().map(trim_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_path_extracts_content_text() {
        let body = serde_json::json!({
            "content": [{"type": "text", "text": "Bearish risk noted."}]
        });
        let text = body
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("text"))
            .and_then(|t| t.as_str())
            .map(trim_response);
        assert_eq!(text.as_deref(), Some("Bearish risk noted."));
    }
}
