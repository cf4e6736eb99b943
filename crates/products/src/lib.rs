//! Products domain module.
//!
//! Business rules for the product catalog, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod event;
pub mod form;
pub mod image;
pub mod product;
pub mod stock;

pub use category::Category;
pub use event::CatalogEvent;
pub use form::{
    CreateProduct, FieldChanges, MAX_PRICE, MAX_PRICE_SCALE, ProductFields, ProductForm,
    UpdateProduct,
};
pub use image::ImageUpload;
pub use product::{MAX_IMAGES, Product, ProductId};
pub use stock::{LOW_STOCK_THRESHOLD, StockStatus};
