use anyhow::Result;
use linemon_alert::engine::MonitorEngine;
use linemon_collector::simulator::RandomWalkSource;
use linemon_server::{app, logging};
use linemon_server::config::ServerConfig;
use linemon_server::cycle::CycleScheduler;
use linemon_server::state::AppState;
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = logging::build_env_filter(rust_log.as_deref())?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/server.toml".to_string());
    run_server(&config_path).await
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    tracing::info!(
        http_port = config.http_port,
        cycle_interval_secs = config.cycle_interval_secs,
        alert_retention = config.alert_retention,
        lines = config.simulator.lines.len(),
        "linemon-server starting"
    );

    let engine = MonitorEngine::new(config.engine_config())?;
    let source = RandomWalkSource::new(&config.simulator)?;
    let interval_secs = config.cycle_interval_secs;
    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;

    let state = AppState::new(engine, config);

    let scheduler = CycleScheduler::new(state.clone(), Box::new(source), interval_secs);
    let cycle_handle = tokio::spawn(scheduler.run());

    let app = app::build_http_app(state);
    let http_listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(http = %http_addr, "Server started");

    tokio::select! {
        result = axum::serve(http_listener, app)
            .with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server error");
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    cycle_handle.abort();
    tracing::info!("Server stopped");

    Ok(())
}
