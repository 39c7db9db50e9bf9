use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use telos_dashboard::*;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let (tx, _) =
        broadcast::channel::<models::DashboardEvent>(app_config.polling.broadcast_capacity);

    let chain = Arc::new(chain_repo::JsonRpcChain::new(
        app_config.chain.rpc_url.clone(),
        Duration::from_millis(app_config.chain.request_timeout_ms),
    )?);
    let price = Arc::new(price_repo::HttpPriceIndex::new(
        app_config.price.url.clone(),
        app_config.price.asset.clone(),
        Duration::from_millis(app_config.price.request_timeout_ms),
    )?);
    let registry = sources::dashboard_registry(sources::DashboardSources {
        chain,
        price,
        staked_contract: app_config.chain.staked_contract.clone(),
        validator_count: app_config.polling.validator_count,
    })?;
    tracing::info!(
        rpc_url = %app_config.chain.rpc_url,
        sources = registry.len(),
        "sources registered"
    );

    let sink = Arc::new(render::BroadcastSink::new(tx.clone()));
    let aggregator = Arc::new(aggregator::Aggregator::new(
        registry,
        app_config.polling.max_data_points,
        sink,
    ));
    let scheduler = scheduler::spawn(
        aggregator.clone(),
        scheduler::SchedulerConfig {
            interval_ms: app_config.polling.interval_ms,
        },
    );

    let app = routes::app(tx, aggregator, Arc::new(AtomicUsize::new(0)));
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }
    scheduler.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
