use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::mpsc;

use crate::config::collectors_config::FilingFeedConfig;
use crate::domain::alert::{Alert, AlertKind};
use crate::domain::ports::Collector;
use crate::domain::recency_cache::RecencyCache;
use crate::infrastructure::ticker_resolver::TickerResolver;

/// `"<form> - <Company> (<digits>) (<filer>)"`, the SEC EDGAR ATOM title shape.
static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<form>\S+)\s*-\s*(?P<company>.+?)\s*\((?P<cik>\d+)\)").unwrap());

fn feed_url(form: &str) -> String {
    format!(
        "https://www.sec.gov/cgi-bin/browse-edgar?action=getcurrent&type={form}&company=&dateb=&owner=include&count=40&output=atom"
    )
}

struct FeedSource {
    form: String,
    kind: AlertKind,
}

/// Polls SEC-style ATOM feeds for one form type each, extracting company/CIK
/// from the entry title and resolving tickers, grounded on the teacher's
/// RSS poller for the poll-and-parse loop and on the original collector for
/// the feed map and title regex.
pub struct FilingFeed {
    config: FilingFeedConfig,
    resolver: Arc<TickerResolver>,
    client: reqwest::Client,
}

impl FilingFeed {
    pub fn new(config: FilingFeedConfig, resolver: Arc<TickerResolver>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .expect("reqwest client");
        Self { config, resolver, client }
    }

    fn sources(&self) -> Vec<FeedSource> {
        let mut sources = Vec::new();
        if self.config.enable_8k {
            sources.push(FeedSource { form: "8-K".to_string(), kind: AlertKind::Filing8K });
        }
        if self.config.enable_s3 {
            sources.push(FeedSource { form: "S-3".to_string(), kind: AlertKind::FilingS3 });
        }
        if self.config.enable_form4 {
            sources.push(FeedSource { form: "4".to_string(), kind: AlertKind::Form4 });
        }
        if self.config.enable_6k {
            sources.push(FeedSource { form: "6-K".to_string(), kind: AlertKind::Filing6K });
        }
        sources
    }

    async fn poll_once(
        &self,
        source: &FeedSource,
        seen: &Mutex<RecencyCache<String>>,
        tx: &mpsc::Sender<Alert>,
    ) {
        let url = feed_url(&source.form);
        let body = match self.client.get(&url).send().await {
            Ok(resp) => match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, %url, "failed to read filing feed body");
                    return;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, %url, "failed to fetch filing feed");
                return;
            }
        };

        let channel = match rss::Channel::read_from(&body[..]) {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(error = %e, %url, "failed to parse filing feed");
                return;
            }
        };

        for item in channel.items() {
            let Some(title) = item.title() else { continue };
            let entry_id = item.guid().map(|g| g.value().to_string()).unwrap_or_else(|| title.to_string());
            let id = format!("{:x}", md5::compute(format!("{entry_id}{title}")))[..16].to_string();

            {
                let mut cache = seen.lock().expect("recency cache lock");
                if !cache.add(id.clone()) {
                    continue;
                }
            }

            let Some(caps) = TITLE_PATTERN.captures(title) else {
                tracing::debug!(%title, "filing title did not match expected pattern, skipping");
                continue;
            };
            let company = caps["company"].to_string();
            let cik = caps["cik"].to_string();

            let ticker = match self.resolver.table().await {
                Ok(table) => table.cik_to_ticker(&cik).map(str::to_string),
                Err(e) => {
                    tracing::warn!(error = %e, "ticker resolver unavailable");
                    None
                }
            };

            let timestamp: DateTime<Utc> = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            let mut summary = item.description().unwrap_or_default().to_string();
            strip_html_in_place(&mut summary);

            let mut alert = Alert {
                id,
                kind: source.kind,
                priority: crate::domain::alert::Priority::Low,
                ticker,
                company,
                title: title.to_string(),
                summary,
                url: item.link().unwrap_or(&url).to_string(),
                source: "SEC EDGAR".to_string(),
                timestamp,
                enrichment: HashMap::new(),
                raw: None,
            };
            alert.truncate_summary();

            if tx.send(alert).await.is_err() {
                return;
            }
        }
    }
}

fn strip_html_in_place(text: &mut String) {
    static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
    *text = TAG.replace_all(text, "").trim().to_string();
}

#[async_trait]
impl Collector for FilingFeed {
    fn name(&self) -> &str {
        "filing_feed"
    }

    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn produce(&self) -> anyhow::Result<mpsc::Receiver<Alert>> {
        let (tx, rx) = mpsc::channel(256);
        let config = self.config.clone();
        let resolver = Arc::clone(&self.resolver);
        let client = self.client.clone();
        let sources: Vec<(String, AlertKind)> = self
            .sources()
            .into_iter()
            .map(|s| (s.form, s.kind))
            .collect();

        tokio::spawn(async move {
            let collector = FilingFeed { config: config.clone(), resolver, client };
            let seen = Mutex::new(RecencyCache::new(10_000));
            loop {
                for (form, kind) in &sources {
                    let source = FeedSource { form: form.clone(), kind: *kind };
                    collector.poll_once(&source, &seen, &tx).await;
                    tokio::time::sleep(std::time::Duration::from_secs(config.rate_limit_secs)).await;
                }
                tokio::time::sleep(std::time::Duration::from_secs(config.poll_interval_secs)).await;
            }
        });

        Ok(rx)
    }
}
