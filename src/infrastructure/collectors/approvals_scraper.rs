use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use tokio::sync::mpsc;
use url::Url;

use crate::config::collectors_config::ApprovalsConfig;
use crate::domain::alert::{Alert, AlertKind, Priority};
use crate::domain::ports::Collector;
use crate::domain::recency_cache::RecencyCache;

const MAX_ROWS_PER_CYCLE: usize = 20;

/// Scrapes yearly drug-approval index pages for the first HTML table,
/// grounded on the original FDA collector's "current year, fall back to
/// previous year if empty" cadence and row/cell extraction.
pub struct ApprovalsScraper {
    config: ApprovalsConfig,
    client: reqwest::Client,
}

impl ApprovalsScraper {
    pub fn new(config: ApprovalsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn index_url(&self, year: i32) -> String {
        self.config.index_url_template.replace("{year}", &year.to_string())
    }

    async fn scrape_year(
        &self,
        year: i32,
        seen: &Mutex<RecencyCache<String>>,
        tx: &mpsc::Sender<Alert>,
    ) -> usize {
        let url = self.index_url(year);
        let body = match self.client.get(&url).send().await {
            Ok(resp) => match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, %url, "failed to read approvals page body");
                    return 0;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, %url, "failed to fetch approvals page");
                return 0;
            }
        };

        let rows = parse_rows(&body);
        let base = Url::parse(&url).ok();
        let mut emitted = 0;

        for row in rows.into_iter().skip(1).take(MAX_ROWS_PER_CYCLE) {
            if row.cells.len() < 4 {
                continue;
            }
            let drug_name = row.cells[0].text.clone();
            let active_ingredient = row.cells.get(1).map(|c| c.text.clone()).unwrap_or_default();
            let approval_date = row.cells.get(2).map(|c| c.text.clone()).unwrap_or_default();
            let company = row.cells.get(3).map(|c| c.text.clone()).unwrap_or_default();

            let id = format!("{:x}", md5::compute(format!("{drug_name}{approval_date}")))[..16].to_string();
            {
                let mut cache = seen.lock().expect("recency cache lock");
                if !cache.add(id.clone()) {
                    continue;
                }
            }

            let link = row.cells[0].href.as_ref().and_then(|href| {
                base.as_ref()
                    .and_then(|base_url| base_url.join(href).ok())
                    .map(|u| u.to_string())
                    .or_else(|| Some(href.clone()))
            });

            let alert = Alert {
                id,
                kind: AlertKind::FdaApproval,
                priority: Priority::High,
                ticker: None,
                company: company.clone(),
                title: format!("FDA approves {drug_name} ({active_ingredient})"),
                summary: format!("{company} received FDA approval for {drug_name} on {approval_date}."),
                url: link.unwrap_or_else(|| url.clone()),
                source: "FDA".to_string(),
                timestamp: Utc::now(),
                enrichment: HashMap::new(),
                raw: None,
            };

            if tx.send(alert).await.is_err() {
                return emitted;
            }
            emitted += 1;
        }

        emitted
    }
}

struct Cell {
    text: String,
    href: Option<String>,
}

struct Row {
    cells: Vec<Cell>,
}

fn parse_rows(html: &str) -> Vec<Row> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let link_sel = Selector::parse("a").unwrap();

    let Some(table) = document.select(&table_sel).next() else {
        return Vec::new();
    };

    table
        .select(&row_sel)
        .map(|tr| {
            let cells = tr
                .select(&cell_sel)
                .map(|td| Cell {
                    text: td.text().collect::<String>().trim().to_string(),
                    href: td
                        .select(&link_sel)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string),
                })
                .collect();
            Row { cells }
        })
        .collect()
}

#[async_trait]
impl Collector for ApprovalsScraper {
    fn name(&self) -> &str {
        "approvals_scraper"
    }

    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn produce(&self) -> anyhow::Result<mpsc::Receiver<Alert>> {
        let (tx, rx) = mpsc::channel(64);
        let config = self.config.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let scraper = ApprovalsScraper { config: config.clone(), client };
            let seen = Mutex::new(RecencyCache::new(10_000));
            loop {
                let current_year = Utc::now().format("%Y").to_string().parse::<i32>().unwrap_or(2026);
                let emitted = scraper.scrape_year(current_year, &seen, &tx).await;
                if emitted == 0 {
                    scraper.scrape_year(current_year - 1, &seen, &tx).await;
                }
                tokio::time::sleep(std::time::Duration::from_secs(config.poll_interval_secs)).await;
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows_extracts_cells_and_link() {
        let html = r#"
            <table>
                <tr><th>Drug</th><th>Ingredient</th><th>Date</th><th>Company</th></tr>
                <tr>
                    <td><a href="/drugs/drugix">Drugix</a></td>
                    <td>compoundX</td>
                    <td>2025-03-14</td>
                    <td>Duetto Pharma</td>
                </tr>
            </table>
        "#;
        let rows = parse_rows(html);
        assert_eq!(rows.len(), 2);
        let data_row = &rows[1];
        assert_eq!(data_row.cells[0].text, "Drugix");
        assert_eq!(data_row.cells[0].href.as_deref(), Some("/drugs/drugix"));
        assert_eq!(data_row.cells[3].text, "Duetto Pharma");
    }
}
