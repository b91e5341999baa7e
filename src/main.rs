use std::sync::Arc;

use duetto_alerts::application::Engine;
use duetto_alerts::config::Config;
use duetto_alerts::interfaces::http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .pretty()
        .init();

    let config = Config::from_env();
    let bind_address = config.server.bind_address.clone();
    let port = config.server.port;

    let engine = Arc::new(Engine::build(config).await?);
    engine.start().await?;
    tracing::info!("engine started");

    let app = http::router(Arc::clone(&engine));
    let listener = tokio::net::TcpListener::bind(format!("{bind_address}:{port}")).await?;
    tracing::info!(%bind_address, port, "listening");

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server exited with error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    engine.stop().await?;
    Ok(())
}
