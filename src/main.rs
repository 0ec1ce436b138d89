use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use metardecode::models::AppState;
use metardecode::routes::create_router;
use metardecode::services::{HttpMetarSource, SourceConfig, DEFAULT_UPSTREAM_URL};

/// METAR decoder web app
#[derive(Parser, Debug)]
#[command(name = "metardecode")]
#[command(about = "Decodes METAR weather reports into readable text")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000", env = "METAR_LISTEN_ADDR")]
    listen: String,

    /// Endpoint serving raw METAR text
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL, env = "METAR_UPSTREAM_URL")]
    upstream_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 10, env = "METAR_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as json
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.log_json {
        fmt().with_env_filter(filter).with_target(true).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    let config = SourceConfig {
        base_url: args.upstream_url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    };
    let source = match HttpMetarSource::new(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to build http client: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(Arc::new(source)));
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };
    info!(upstream = %config.base_url, "Server running on http://{}", args.listen);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
