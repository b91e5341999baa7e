use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::config::collectors_config::QuoteStreamConfig;
use crate::domain::alert::{Alert, AlertKind, Priority};
use crate::domain::ports::Collector;

fn random_session_id(prefix: &str) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    let suffix: String = (0..12)
        .map(|_| CHARS[rng.random_range(0..CHARS.len())] as char)
        .collect();
    format!("{prefix}_{suffix}")
}

/// Wraps a JSON payload in the `~m~<len>~m~<json>` frame the quote provider
/// expects for every outbound method call.
fn frame(method: &str, params: serde_json::Value) -> String {
    let payload = serde_json::json!({ "m": method, "p": params }).to_string();
    format!("~m~{}~m~{}", payload.len(), payload)
}

/// Persistent websocket client for live price-move alerts. The reconnect
/// loop, writer task and ping task are grounded on the teacher's Binance
/// websocket manager; the `~m~`/`~h~` framing and handshake method sequence
/// are grounded on the original TradingView collector.
pub struct QuoteStream {
    config: QuoteStreamConfig,
    last_pct: Arc<RwLock<HashMap<String, f64>>>,
}

impl QuoteStream {
    pub fn new(config: QuoteStreamConfig) -> Self {
        Self {
            config,
            last_pct: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn run_with_reconnect(config: QuoteStreamConfig, tx: mpsc::Sender<Alert>) {
        let mut backoff = Duration::from_secs(1);
        loop {
            match Self::connect_and_stream(&config, &tx).await {
                Ok(()) => {
                    tracing::info!("quote stream closed gracefully, reconnecting");
                    backoff = Duration::from_secs(1);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "quote stream connection failed, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff = std::cmp::min(backoff * 2, Duration::from_secs(30));
                }
            }
        }
    }

    async fn connect_and_stream(config: &QuoteStreamConfig, tx: &mpsc::Sender<Alert>) -> anyhow::Result<()> {
        let (ws_stream, _) = connect_async(&config.ws_url).await?;
        let (mut write, mut read) = ws_stream.split();

        let chart_session = random_session_id("cs");
        let quote_session = random_session_id("qs");

        write.send(Message::Text(frame("set_auth_token", serde_json::json!(["unauthorized_user_token"])).into())).await?;
        write.send(Message::Text(frame("chart_create_session", serde_json::json!([chart_session, ""])).into())).await?;
        write.send(Message::Text(frame("quote_create_session", serde_json::json!([quote_session])).into())).await?;
        write
            .send(Message::Text(
                frame(
                    "quote_set_fields",
                    serde_json::json!([quote_session, "ch", "chp", "lp", "description", "currency_code", "rchp", "rtc"]),
                )
                .into(),
            ))
            .await?;
        for symbol in &config.symbols {
            write
                .send(Message::Text(
                    frame("quote_add_symbols", serde_json::json!([quote_session, symbol, {"flags": ["force_permission"]}])).into(),
                ))
                .await?;
        }

        let (writer_tx, mut writer_rx) = mpsc::channel::<Message>(32);
        let writer_task = tokio::spawn(async move {
            while let Some(msg) = writer_rx.recv().await {
                if write.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let threshold = config.threshold_pct;
        let mut last_pct: HashMap<String, f64> = HashMap::new();

        while let Some(message) = read.next().await {
            let message = message?;
            match message {
                Message::Text(text) => {
                    for frame_json in split_frames(&text) {
                        if let Some(heartbeat) = heartbeat_echo(&frame_json) {
                            let _ = writer_tx.send(Message::Text(heartbeat.into())).await;
                            continue;
                        }
                        if let Some(alert) = parse_quote_data(&frame_json, threshold, &mut last_pct) {
                            if tx.send(alert).await.is_err() {
                                return Ok(());
                            }
                        }
                    }
                }
                Message::Ping(payload) => {
                    let _ = writer_tx.send(Message::Pong(payload)).await;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        drop(writer_tx);
        let _ = writer_task.await;
        Ok(())
    }
}

/// Splits a raw websocket text payload on `~m~<len>~m~` prefixes, or returns
/// the raw text unchanged if it carries no such prefix (heartbeats use a
/// `~h~<n>` prefix and are handled separately by `heartbeat_echo`).
fn split_frames(text: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("~m~") {
        let after_prefix = &rest[start + 3..];
        let Some(len_end) = after_prefix.find("~m~") else { break };
        let Ok(len) = after_prefix[..len_end].parse::<usize>() else { break };
        let body_start = start + 3 + len_end + 3;
        if body_start + len > rest.len() {
            break;
        }
        frames.push(rest[body_start..body_start + len].to_string());
        rest = &rest[body_start + len..];
    }
    if frames.is_empty() && !text.starts_with("~h~") {
        frames.push(text.to_string());
    }
    frames
}

fn heartbeat_echo(text: &str) -> Option<String> {
    if text.starts_with("~h~") {
        Some(text.to_string())
    } else {
        None
    }
}

fn parse_quote_data(frame_json: &str, threshold_pct: f64, last_pct: &mut HashMap<String, f64>) -> Option<Alert> {
    let value: serde_json::Value = serde_json::from_str(frame_json).ok()?;
    if value.get("m")?.as_str()? != "qsd" {
        return None;
    }
    let params = value.get("p")?.as_array()?;
    let data = params.get(1)?;
    let symbol = data.get("n")?.as_str()?.to_string();
    let values = data.get("v")?;
    let change_pct = values.get("chp")?.as_f64()?;
    let last_price = values.get("lp").and_then(|v| v.as_f64());

    last_pct.insert(symbol.clone(), change_pct);

    if change_pct.abs() < threshold_pct {
        return None;
    }

    let ticker = symbol.split(':').next_back().unwrap_or(&symbol).to_string();
    let direction = if change_pct >= 0.0 { "UP" } else { "DOWN" };
    let priority = if change_pct.abs() > 20.0 { Priority::High } else { Priority::Medium };
    let now = Utc::now();
    let id = format!(
        "tv_{}_{}_{}",
        ticker,
        now.format("%Y%m%d%H%M%S"),
        (change_pct.abs() * 100.0) as i64
    );

    let mut enrichment = HashMap::new();
    if let Some(price) = last_price {
        enrichment.insert("last_price".to_string(), serde_json::json!(price));
    }

    Some(Alert {
        id,
        kind: AlertKind::PriceMove,
        priority,
        ticker: Some(ticker.clone()),
        company: ticker.clone(),
        title: format!("{ticker} {direction} {:.2}%", change_pct.abs()),
        summary: format!("{ticker} moved {direction} {:.2}% (threshold {:.2}%).", change_pct.abs(), threshold_pct),
        url: String::new(),
        source: "TradingView".to_string(),
        timestamp: now,
        enrichment,
        raw: None,
    })
}

#[async_trait]
impl Collector for QuoteStream {
    fn name(&self) -> &str {
        "quote_stream"
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
        tokio::spawn(Self::run_with_reconnect(config, tx));
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_wraps_payload_with_length_prefix() {
        let framed = frame("set_auth_token", serde_json::json!(["tok"]));
        assert!(framed.starts_with("~m~"));
        let parts: Vec<&str> = framed.splitn(3, "~m~").collect();
        let len: usize = parts[1].parse().unwrap();
        assert_eq!(parts[2].len(), len);
    }

    #[test]
    fn split_frames_recovers_single_payload() {
        let framed = frame("quote_add_symbols", serde_json::json!(["qs_x", "NASDAQ:AAPL"]));
        let frames = split_frames(&framed);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("quote_add_symbols"));
    }

    #[test]
    fn heartbeat_is_echoed_verbatim() {
        assert_eq!(heartbeat_echo("~h~42"), Some("~h~42".to_string()));
        assert_eq!(heartbeat_echo("not a heartbeat"), None);
    }

    #[test]
    fn second_consecutive_quote_crosses_threshold_after_first_does_not() {
        let mut last_pct = HashMap::new();
        let below = serde_json::json!({"m": "qsd", "p": ["qs_1", {"n": "NASDAQ:AAPL", "v": {"chp": 5.0, "lp": 100.0}}]}).to_string();
        let above = serde_json::json!({"m": "qsd", "p": ["qs_1", {"n": "NASDAQ:AAPL", "v": {"chp": 25.0, "lp": 120.0}}]}).to_string();

        assert!(parse_quote_data(&below, 10.0, &mut last_pct).is_none());
        let alert = parse_quote_data(&above, 10.0, &mut last_pct).expect("above threshold emits");
        assert_eq!(alert.priority, Priority::High);
        assert!(alert.title.ends_with("UP 25.00%"));
    }
}
