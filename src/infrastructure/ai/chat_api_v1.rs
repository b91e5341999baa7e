use async_trait::async_trait;

use crate::config::ai_config::AiEnvConfig;
use crate::domain::alert::Alert;
use crate::domain::ports::AiEnricher;
use crate::infrastructure::ai::prompt::{build_prompt, trim_response, SYSTEM_PROMPT};

/// OpenAI-style `chat/completions` provider. Grounded on the original
/// `OpenAIProvider`: same endpoint shape, same `choices[0].message.content`
/// response path, same low-temperature/short-output call parameters.
pub struct ChatApiV1Enricher {
    config: AiEnvConfig,
    client: reqwest::Client,
}

impl ChatApiV1Enricher {
    pub fn new(config: AiEnvConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl AiEnricher for ChatApiV1Enricher {
    fn name(&self) -> &str {
        "chat_v1"
    }

    async fn analyze(&self, alert: &Alert) -> Option<String> {
        let api_key = self.config.api_key.as_ref()?;

        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(alert)},
            ],
            "temperature": 0.3,
            "max_tokens": 300,
        });

        let url = format!("{}/chat/completions", self.config.base_url);
        let resp = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "chat_v1 enrichment request failed");
                return None;
            }
        };

        let body: serde_json::Value = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "chat_v1 enrichment response was not valid JSON");
                return None;
            }
        };

        body.get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
            .map(trim_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_path_extracts_choices_message_content() {
        let body = serde_json::json!({
            "choices": [{"message": {"content": "  Bullish on the deal.  "}}]
        });
        let text = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(trim_response);
        assert_eq!(text.as_deref(), Some("Bullish on the deal."));
    }
}
