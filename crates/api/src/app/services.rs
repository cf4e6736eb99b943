use std::sync::Arc;

use shopdeck_infra::{
    CatalogService, GatewayConfig, ImageStore, InMemoryProductRepository, LocalImageStore,
    ProductRepository,
};

/// Shared services handed to every handler through an `Extension`.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
}

impl AppServices {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

/// Wire the catalog service from configuration.
///
/// Postgres is used when the `postgres` feature is enabled and `DATABASE_URL`
/// is set; otherwise products live in memory for the lifetime of the process.
pub async fn build_services(config: &GatewayConfig) -> anyhow::Result<AppServices> {
    let repo = build_repository(config).await?;
    let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(
        config.upload_dir.clone(),
        &config.public_base_url,
    ));

    Ok(AppServices::new(CatalogService::new(
        repo,
        images,
        config.list_order,
    )))
}

#[cfg(feature = "postgres")]
async fn build_repository(config: &GatewayConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    use anyhow::Context;

    match &config.database_url {
        Some(url) => {
            // connect() also creates the products table when missing
            let repo = shopdeck_infra::PostgresProductRepository::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!("using Postgres product repository");
            Ok(Arc::new(repo))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory product repository");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_repository(config: &GatewayConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the `postgres` feature");
    }
    tracing::info!("using in-memory product repository");
    Ok(Arc::new(InMemoryProductRepository::new()))
}
