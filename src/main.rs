#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! KalEl ledger host (systemd-friendly).
//! Opens a deployed ledger and serves it over HTTP until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use kalel_token::api::http::{router, ApiState};
use kalel_token::core::runtime::deploy::{ledger_dir, open_deployed};
use kalel_token::core::runtime::executor::TokenExecutor;
use kalel_token::core::types::Address;
use kalel_token::monitoring::{logging::init_tracing, metrics::Metrics};
use tracing::{info, warn};

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let data_dir = env("KALEL_DATA_DIR", "./data");
    let http_addr = env("KALEL_HTTP_ADDR", "127.0.0.1:8545");
    let token: Address = std::env::var("KALEL_TOKEN_ADDRESS")
        .context("KALEL_TOKEN_ADDRESS is required")?
        .parse()
        .context("KALEL_TOKEN_ADDRESS is not a valid address")?;

    let store = open_deployed(&data_dir, &token).with_context(|| {
        format!("open ledger store at {}", ledger_dir(&data_dir, &token).display())
    })?;

    let metrics = Arc::new(Metrics::new().context("metrics init")?);
    let executor = Arc::new(TokenExecutor::open(store, metrics)?);
    let info = executor.token_info()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        built = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        %token,
        name = %info.name,
        symbol = %info.symbol,
        owner = %info.owner,
        paused = info.paused,
        seq = executor.last_seq()?,
        "kalel ledger host starting"
    );

    let app = router(ApiState { executor });
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;
    info!(%http_addr, "http listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(?e, "ctrl-c handler failed");
            }
        })
        .await
        .context("http server")?;

    info!("kalel ledger host stopped");
    Ok(())
}
