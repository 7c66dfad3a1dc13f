use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use streetguess_api::{build_router, AppState};
use streetguess_common::Config;
use streetguess_game::MapillaryLocator;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("streetguess=info,mapillary_client=info,tower_http=info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = Config::from_env()?;
    let locator = MapillaryLocator::from_config(&config)?;

    let state = Arc::new(AppState {
        locator: Arc::new(locator),
    });
    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("StreetGuess API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
