use std::sync::Arc;

use anyhow::Context;
use domain::storage::filesystem::FilesystemAssetStore;
use server::config::AppConfig;
use server::state::AppState;
use server::store::{SeaCatalogStore, SeaOrderStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    server::seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let assets = FilesystemAssetStore::new(
        config.storage.asset_dir.clone(),
        config.catalog.max_image_bytes,
        config.storage.public_base_url.clone(),
    )
    .await
    .context("Failed to prepare asset directory")?;
    info!("Storing assets under {}", config.storage.asset_dir.display());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(
        config,
        Arc::new(SeaCatalogStore::new(db.clone())),
        Arc::new(SeaOrderStore::new(db)),
        Arc::new(assets),
    );
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
