use anyhow::{Context, bail};
use db::DBService;
use server::{AppState, config::ServerConfig, routes};
use services::services::{database_validator::DatabaseValidator, user::UserService};
use tracing_subscriber::{EnvFilter, prelude::*};
use utils::sentry::{init_once as sentry_init_once, sentry_layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = if cfg!(debug_assertions) { "dev" } else { "production" };
    sentry_init_once(environment);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},utils={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).context("invalid RUST_LOG")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .with(sentry_layer())
        .init();

    let config = ServerConfig::from_env()?;

    let db = DBService::new(&config.database_url).await?;
    let validation = DatabaseValidator::new(db.pool.clone()).validate().await?;
    if !validation.is_ok() {
        bail!(validation.summary());
    }
    tracing::info!("{}", validation.summary());

    if config.allow_demo_user {
        let demo = UserService::ensure_demo_user(&db.pool).await?;
        tracing::info!(user_id = %demo.id, "Demo user ready");
    }

    let addr = config.bind_address();
    let app = routes::router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
