//! Collector configuration parsing from environment variables.
//!
//! Covers the three collector variants: FilingFeed (regulatory filings),
//! ApprovalsScraper (drug approvals) and QuoteStream (live quotes).

use std::env;

/// FilingFeed (SEC EDGAR-style ATOM feeds) environment configuration.
#[derive(Debug, Clone)]
pub struct FilingFeedConfig {
    pub enabled: bool,
    pub user_agent: String,
    pub poll_interval_secs: u64,
    pub rate_limit_secs: u64,
    pub enable_8k: bool,
    pub enable_s3: bool,
    pub enable_form4: bool,
    pub enable_6k: bool,
}

impl Default for FilingFeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: "DuettoAlerts/1.0 (ops@example.com)".to_string(),
            poll_interval_secs: 60,
            rate_limit_secs: 1,
            enable_8k: true,
            enable_s3: true,
            enable_form4: true,
            enable_6k: true,
        }
    }
}

impl FilingFeedConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            enabled: env::var("DUETTO_FILING_FEED__ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            user_agent: env::var("DUETTO_FILING_FEED__USER_AGENT").unwrap_or(default.user_agent),
            poll_interval_secs: env::var("DUETTO_FILING_FEED__POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.poll_interval_secs),
            rate_limit_secs: env::var("DUETTO_FILING_FEED__RATE_LIMIT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.rate_limit_secs),
            enable_8k: env::var("DUETTO_FILING_FEED__ENABLE_8K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            enable_s3: env::var("DUETTO_FILING_FEED__ENABLE_S3")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            enable_form4: env::var("DUETTO_FILING_FEED__ENABLE_FORM4")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            enable_6k: env::var("DUETTO_FILING_FEED__ENABLE_6K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// ApprovalsScraper (FDA-style drug approvals) environment configuration.
#[derive(Debug, Clone)]
pub struct ApprovalsConfig {
    pub enabled: bool,
    pub poll_interval_secs: u64,
    pub index_url_template: String,
}

impl Default for ApprovalsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 3600,
            index_url_template: "https://www.fda.gov/drugs/novel-drug-approvals-fda/novel-drug-approvals-{year}".to_string(),
        }
    }
}

impl ApprovalsConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            enabled: env::var("DUETTO_APPROVALS__ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            poll_interval_secs: env::var("DUETTO_APPROVALS__POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.poll_interval_secs),
            index_url_template: env::var("DUETTO_APPROVALS__INDEX_URL_TEMPLATE")
                .unwrap_or(default.index_url_template),
        }
    }
}

/// QuoteStream (TradingView-style websocket) environment configuration.
#[derive(Debug, Clone)]
pub struct QuoteStreamConfig {
    pub enabled: bool,
    pub ws_url: String,
    pub symbols: Vec<String>,
    pub threshold_pct: f64,
}

impl Default for QuoteStreamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ws_url: "wss://data.tradingview.com/socket.io/websocket".to_string(),
            symbols: Vec::new(),
            threshold_pct: 10.0,
        }
    }
}

impl QuoteStreamConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            enabled: env::var("DUETTO_QUOTE_STREAM__ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
            ws_url: env::var("DUETTO_QUOTE_STREAM__WS_URL").unwrap_or(default.ws_url),
            symbols: env::var("DUETTO_QUOTE_STREAM__SYMBOLS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
                .unwrap_or_default(),
            threshold_pct: env::var("DUETTO_QUOTE_STREAM__THRESHOLD_PCT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.threshold_pct),
        }
    }
}

/// Aggregated collector configuration.
#[derive(Debug, Clone, Default)]
pub struct CollectorsEnvConfig {
    pub filing_feed: FilingFeedConfig,
    pub approvals: ApprovalsConfig,
    pub quote_stream: QuoteStreamConfig,
}

impl CollectorsEnvConfig {
    pub fn from_env() -> Self {
        Self {
            filing_feed: FilingFeedConfig::from_env(),
            approvals: ApprovalsConfig::from_env(),
            quote_stream: QuoteStreamConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filing_feed_defaults_enable_all_forms() {
        let config = FilingFeedConfig::default();
        assert!(config.enable_8k);
        assert!(config.enable_s3);
        assert!(config.enable_form4);
        assert!(config.enable_6k);
    }

    #[test]
    fn approvals_default_url_contains_year_placeholder() {
        let config = ApprovalsConfig::default();
        assert!(config.index_url_template.contains("{year}"));
    }

    #[test]
    fn quote_stream_default_is_disabled_with_no_symbols() {
        let config = QuoteStreamConfig::default();
        assert!(!config.enabled);
        assert!(config.symbols.is_empty());
    }
}
