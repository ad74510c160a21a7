use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use users_dashboard::{
    config::Config,
    controller::Controller,
    db,
    handlers::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        api_url = %config.api_url,
        database_url = %config.database_url,
        refresh_ttl_secs = config.refresh_ttl_secs,
        "Starting users dashboard"
    );

    let pool = db::init_db_pool(&config.database_url, config.max_pool_size)
        .await
        .context("failed to open the users database")?;

    let controller = Controller::new(&config, pool)?;
    let app = handlers::router(AppState::new(controller));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
