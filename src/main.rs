use airguard::*;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

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
    let source = Arc::new(source::HttpSource::new(
        &app_config.backend.base_url,
        Duration::from_millis(app_config.backend.fetch_timeout_ms()),
    )?);
    tracing::info!(backend = source.base_url(), "Polling air-quality backend");

    let (snapshot_tx, snapshot_rx) = watch::channel(acquisition::DashboardSnapshot::new());
    let shutdown = CancellationToken::new();

    let poller_handle = acquisition::spawn(
        acquisition::PollerDeps {
            source,
            snapshot_tx,
            shutdown: shutdown.clone(),
        },
        acquisition::PollerConfig {
            interval_ms: app_config.poll.interval_ms,
            fetch_timeout_ms: app_config.backend.fetch_timeout_ms(),
            stats_log_interval_secs: app_config.poll.stats_log_interval_secs,
        },
    );

    let app = routes::app(snapshot_rx, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
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
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    shutdown.cancel();
    let _ = poller_handle.await;
    Ok(())
}
