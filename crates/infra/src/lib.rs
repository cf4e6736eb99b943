//! Infrastructure layer: persistence, image storage, configuration, and the
//! catalog service that composes them.

pub mod catalog_service;
pub mod config;
pub mod images;
pub mod repository;

pub use catalog_service::{CatalogError, CatalogService};
pub use config::{ConfigError, GatewayConfig, ListOrder};
pub use images::{ImageStore, ImageStoreError, InMemoryImageStore, LocalImageStore};
pub use repository::{
    InMemoryProductRepository, Modified, ModifyError, ProductMutation, ProductRepository,
    StorageError,
};
#[cfg(feature = "postgres")]
pub use repository::PostgresProductRepository;
