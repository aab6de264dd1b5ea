//! # Hospital Catalog - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` → تنظیمات → لاگ → دیتابیس و snapshot → سرور

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hospital_catalog::{
    api::create_router,
    config::Config,
    error::{AppError, Result},
    services::AppState,
    utils::mask_string,
};

#[tokio::main]
async fn main() -> Result<()> {
    // نبودن فایل .env مشکلی نیست
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_tracing(&config);

    info!("Starting Hospital Catalog Service...");
    config.validate()?;
    info!(
        environment = ?config.environment,
        database = config.database.is_configured(),
        db_user = %config.database.user.as_deref().map(|u| mask_string(u, 2)).unwrap_or_default(),
        snapshot_dir = %config.snapshot_dir,
        "Configuration loaded"
    );

    let addr = config.server_addr();
    let state = AppState::bootstrap(config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

/// راه‌اندازی tracing
///
/// در production خروجی JSON (برای جمع‌آوری لاگ)، در بقیه محیط‌ها خوانا.
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hospital_catalog=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}

/// صبر تا Ctrl+C
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
