pub mod chat_api_v1;
pub mod chat_api_v2;
pub mod prompt;
pub mod rule_based;

pub use chat_api_v1::ChatApiV1Enricher;
pub use chat_api_v2::ChatApiV2Enricher;
pub use rule_based::RuleBasedEnricher;
