//! AI enrichment configuration parsing from environment variables.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProviderKind {
    Rule,
    ChatV1,
    ChatV2,
}

impl AiProviderKind {
    fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "chat_v1" | "openai" => AiProviderKind::ChatV1,
            "chat_v2" | "anthropic" => AiProviderKind::ChatV2,
            _ => AiProviderKind::Rule,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiEnvConfig {
    pub enabled: bool,
    pub provider: AiProviderKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for AiEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: AiProviderKind::Rule,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl AiEnvConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        let provider = AiProviderKind::from_str(&env::var("DUETTO_AI__PROVIDER").unwrap_or_else(|_| "rule".to_string()));
        let base_url = match provider {
            AiProviderKind::ChatV2 => env::var("DUETTO_AI__BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string()),
            _ => env::var("DUETTO_AI__BASE_URL").unwrap_or(default.base_url.clone()),
        };
        Self {
            enabled: env::var("DUETTO_AI__ENRICHMENT_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            provider,
            api_key: env::var("DUETTO_AI__API_KEY").ok().filter(|v| !v.is_empty()),
            base_url,
            model: env::var("DUETTO_AI__MODEL").unwrap_or(default.model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_rule_based() {
        let config = AiEnvConfig::default();
        assert_eq!(config.provider, AiProviderKind::Rule);
    }

    #[test]
    fn provider_kind_parses_known_aliases() {
        assert_eq!(AiProviderKind::from_str("openai"), AiProviderKind::ChatV1);
        assert_eq!(AiProviderKind::from_str("anthropic"), AiProviderKind::ChatV2);
        assert_eq!(AiProviderKind::from_str("nonsense"), AiProviderKind::Rule);
    }
}
