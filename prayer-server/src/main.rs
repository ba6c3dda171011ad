use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use prayer_server::aladhan::PrayerClient;
use prayer_server::cache::CachedPrayerClient;
use prayer_server::config::ServerConfig;
use prayer_server::monitoring::{
    LogCategory, LogInput, LogLevel, Monitor, MonitorHandle, MonitorStore,
};
use prayer_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,prayer_server=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let client = PrayerClient::new(config.client.clone())?;
    let prayers = CachedPrayerClient::new(client, &config.cache);
    info!(
        attempts = prayers.client().strategy().max_attempts(),
        method = config.client.method,
        ttl_secs = config.cache.ttl.as_secs(),
        "prayer time client ready"
    );

    let mut monitor = match &config.monitoring_store {
        Some(path) => Monitor::with_store(MonitorStore::new(path)),
        None => Monitor::in_memory(),
    };
    monitor.log(LogInput::new(LogLevel::Info, LogCategory::System, "server_started"));
    info!(session_id = monitor.session_id(), "monitoring ready");

    let state = AppState::new(prayers, MonitorHandle::new(monitor));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "prayer times server listening");
    info!("  GET    /api/prayer-times    - Today's schedule (?date=&city=&lang=)");
    info!("  GET    /api/cities          - City directory");
    info!("  GET    /api/monitoring/...  - Logs, metrics, security events, analytics");

    axum::serve(listener, app).await?;
    Ok(())
}
