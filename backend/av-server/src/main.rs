use av_server::{MockDevice, ServerError, ServerState, build_router, logger};

use av_audit::{AuditService, AuditServiceConfig};
use av_auth::JwtValidator;
use av_config::Config;
use av_db::SqliteAuditStore;
use av_ws::{ConnectionConfig, Hub, Metrics, StatusPoller};

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    let log_file_path: Option<PathBuf> = match config.logging.file {
        Some(ref filename) => {
            let log_dir = Config::config_dir()?.join(&config.logging.dir);
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting av-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    if !config.device.mock {
        return Err(ServerError::UnsupportedDevice.into());
    }

    let pool = av_db::connect(&config.database_path()?).await?;

    let metrics = Metrics::new();

    // Hub loop owns every client mailbox
    let (hub, hub_handle) = Hub::new(config.websocket.mailbox_capacity, metrics.clone());
    let hub_task = tokio::spawn(hub.run());

    let mut audit = AuditService::new(
        AuditServiceConfig::from(&config.audit),
        Arc::new(SqliteAuditStore::new(pool.clone())),
    );
    audit.start();

    let device = Arc::new(MockDevice::new());
    info!("Device: mock");

    let poller = if config.polling.enabled {
        Some(StatusPoller::start(
            device.clone(),
            hub_handle.clone(),
            config.poll_interval(),
            metrics.clone(),
        ))
    } else {
        info!("Status polling disabled");
        None
    };

    // Create JWT validator (optional based on auth.enabled)
    let jwt_validator: Option<Arc<JwtValidator>> = match config.auth.jwt_secret {
        Some(ref secret) if config.auth.enabled => {
            info!("JWT: HS256 authentication enabled");
            Some(Arc::new(JwtValidator::with_hs256(secret.as_bytes())))
        }
        _ => {
            warn!("Authentication DISABLED - callers identify themselves");
            None
        }
    };

    let state = ServerState {
        ws: av_ws::AppState {
            hub: hub_handle.clone(),
            jwt_validator,
            config: ConnectionConfig::from(&config.websocket),
            metrics,
        },
        audit: audit.logger(),
        device: device.clone(),
        status: device,
        pool: pool.clone(),
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let shutdown_hub = hub_handle.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for SIGINT: {e}"),
        }
        // Viewers get a close frame so the server can drain
        shutdown_hub.close();
    })
    .await?;

    if let Some(poller) = poller {
        poller.stop().await;
    }

    hub_handle.close();
    if let Err(e) = hub_task.await {
        warn!("Hub task ended abnormally: {e}");
    }

    let report = audit.shutdown().await;
    info!(
        "Audit log closed: {} flushed, {} dropped",
        report.flushed, report.dropped
    );

    pool.close().await;
    info!("Graceful shutdown complete");

    Ok(())
}
