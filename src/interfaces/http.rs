use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::application::Engine;

/// Push-subscriber HTTP/WS shell: `/ws` upgrades to a live alert feed, and
/// `/status` + `/alerts/recent` report engine state. Grounded on the
/// original FastAPI server's endpoint shapes, reusing `BroadcastHub` for the
/// connection-management semantics.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .route("/alerts/recent", get(recent_handler))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

async fn ws_handler(ws: WebSocketUpgrade, State(engine): State<Arc<Engine>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, engine))
}

async fn handle_socket(mut socket: WebSocket, engine: Arc<Engine>) {
    let (handle, mut rx) = engine.hub.attach().await;

    loop {
        tokio::select! {
            alert = rx.recv() => {
                match alert {
                    Some(alert) => {
                        let payload = match serde_json::to_string(&alert) {
                            Ok(p) => p,
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to serialize alert for subscriber");
                                continue;
                            }
                        };
                        if socket.send(WsMessage::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = socket.recv() => {
                if incoming.is_none() {
                    break;
                }
            }
        }
    }

    engine.hub.detach(&handle).await;
}

async fn status_handler(State(engine): State<Arc<Engine>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": if engine.is_running() { "running" } else { "stopped" },
        "connections": engine.hub.subscriber_count().await,
        "alerts_count": engine.hub.history_len().await,
    }))
}

async fn recent_handler(State(engine): State<Arc<Engine>>) -> Json<Vec<crate::domain::Alert>> {
    Json(engine.hub.recent(100).await)
}
