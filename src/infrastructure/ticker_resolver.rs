use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::domain::errors::ResolverError;

const REMOTE_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const USER_AGENT: &str = "DuettoAlerts/1.0 (ops@example.com)";

#[derive(Debug, Deserialize)]
struct RawEntry {
    cik_str: serde_json::Value,
    ticker: String,
    title: String,
}

/// CIK <-> ticker <-> name lookup table. CIK is stored both as the decimal
/// string SEC emits and zero-padded to 10 digits, so lookups succeed
/// regardless of which form a filing title spells it with.
#[derive(Debug, Default)]
pub struct TickerTable {
    cik_to_ticker: HashMap<String, String>,
    ticker_to_cik: HashMap<String, String>,
    cik_to_name: HashMap<String, String>,
}

impl TickerTable {
    fn insert(&mut self, cik_raw: String, ticker: String, name: String) {
        let padded = format!("{:0>10}", cik_raw);
        let ticker_upper = ticker.to_ascii_uppercase();
        self.cik_to_ticker.insert(cik_raw.clone(), ticker_upper.clone());
        self.cik_to_ticker.insert(padded.clone(), ticker_upper.clone());
        self.cik_to_name.insert(cik_raw.clone(), name.clone());
        self.cik_to_name.insert(padded, name);
        self.ticker_to_cik.insert(ticker_upper, cik_raw);
    }

    pub fn cik_to_ticker(&self, cik: &str) -> Option<&str> {
        self.cik_to_ticker.get(cik).map(String::as_str)
    }

    pub fn ticker_to_cik(&self, ticker: &str) -> Option<&str> {
        self.ticker_to_cik.get(&ticker.to_ascii_uppercase()).map(String::as_str)
    }

    pub fn cik_to_name(&self, cik: &str) -> Option<&str> {
        self.cik_to_name.get(cik).map(String::as_str)
    }

    pub fn ticker_to_name(&self, ticker: &str) -> Option<&str> {
        self.ticker_to_cik(ticker).and_then(|cik| self.cik_to_name(cik))
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<(&str, &str)> {
        self.cik_to_name
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .and_then(|(cik, _)| self.cik_to_ticker(cik).map(|ticker| (ticker, cik.as_str())))
    }

    pub fn search_by_name(&self, substring: &str, limit: usize) -> Vec<(String, String, String)> {
        let needle = substring.to_ascii_lowercase();
        let mut results = Vec::new();
        for (cik, name) in &self.cik_to_name {
            if name.to_ascii_lowercase().contains(&needle) {
                if let Some(ticker) = self.cik_to_ticker(cik) {
                    results.push((ticker.to_string(), cik.clone(), name.clone()));
                }
                if results.len() >= limit {
                    break;
                }
            }
        }
        results
    }
}

/// Loads and caches the SEC ticker table. Load is single-flighted via
/// `OnceCell` so concurrent collectors share one fetch.
pub struct TickerResolver {
    client: reqwest::Client,
    cache_path: PathBuf,
    table: OnceCell<TickerTable>,
}

impl TickerResolver {
    pub fn new() -> Self {
        let cache_path = std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".duetto")
            .join("cache")
            .join("company_tickers.json");

        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("reqwest client"),
            cache_path,
            table: OnceCell::new(),
        }
    }

    pub async fn table(&self) -> Result<&TickerTable, ResolverError> {
        self.table
            .get_or_try_init(|| async { self.load().await })
            .await
    }

    async fn load(&self) -> Result<TickerTable, ResolverError> {
        let body = match tokio::fs::read_to_string(&self.cache_path).await {
            Ok(contents) => contents,
            Err(_) => {
                let fetched = self.fetch_remote().await?;
                self.persist(&fetched).await;
                fetched
            }
        };
        Self::parse(&body)
    }

    async fn fetch_remote(&self) -> Result<String, ResolverError> {
        let resp = self
            .client
            .get(REMOTE_URL)
            .send()
            .await
            .map_err(|e| ResolverError::RemoteFetch {
                url: REMOTE_URL.to_string(),
                reason: e.to_string(),
            })?;
        resp.text().await.map_err(|e| ResolverError::RemoteFetch {
            url: REMOTE_URL.to_string(),
            reason: e.to_string(),
        })
    }

    async fn persist(&self, body: &str) {
        if let Some(parent) = self.cache_path.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        if let Err(e) = tokio::fs::write(&self.cache_path, body).await {
            tracing::warn!(error = %e, path = %self.cache_path.display(), "failed to persist ticker cache");
        }
    }

    fn parse(body: &str) -> Result<TickerTable, ResolverError> {
        let raw: HashMap<String, RawEntry> =
            serde_json::from_str(body).map_err(|e| ResolverError::CacheRead {
                path: "company_tickers.json".to_string(),
                reason: e.to_string(),
            })?;

        let mut table = TickerTable::default();
        for entry in raw.into_values() {
            let cik = match &entry.cik_str {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            table.insert(cik, entry.ticker, entry.title);
        }
        Ok(table)
    }
}

impl Default for TickerResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_builds_padded_and_raw_cik_entries() {
        let body = r#"{"0":{"cik_str":320193,"ticker":"aapl","title":"Apple Inc."}}"#;
        let table = TickerTable::from_json_for_test(body);
        assert_eq!(table.cik_to_ticker("320193"), Some("AAPL"));
        assert_eq!(table.cik_to_ticker("0000320193"), Some("AAPL"));
        assert_eq!(table.ticker_to_cik("aapl"), Some("320193"));
        assert_eq!(table.cik_to_name("320193"), Some("Apple Inc."));
    }

    impl TickerTable {
        fn from_json_for_test(body: &str) -> TickerTable {
            TickerResolver::parse(body).unwrap()
        }
    }
}
