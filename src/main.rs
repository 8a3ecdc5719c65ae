//! EzyGrocery pricing service

use anyhow::Result;
use ezygrocery_pricing::{api, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        currency = %config.store.currency,
        surge_stacking = ?config.pricing.surge_stacking,
        slab_fallback = ?config.pricing.slab_fallback,
        "store settings loaded"
    );
    let port = config.port;
    let app = api::router(api::AppState::new(config));

    tracing::info!("EzyGrocery pricing listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
