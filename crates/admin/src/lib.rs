//! `shopdeck-admin`
//!
//! **Responsibility:** the product-management client behind the admin page.
//!
//! This crate provides:
//! - Draft editing with staged image files and local previews
//! - CRUD requests against the catalog gateway (the gateway stays the authority)
//! - A lazily re-fetched product list, invalidated by mutation events
//!
//! The list is never patched from a mutation response; a successful mutation
//! publishes a [`CatalogEvent`](shopdeck_products::CatalogEvent) and the list
//! re-fetches once on its next read.

pub mod api;
pub mod controller;
pub mod draft;
pub mod error;
pub mod list;
pub mod page;
pub mod preview;
pub mod view;

pub use api::{CatalogApi, HttpCatalogApi};
pub use controller::{ProductsController, SubmitOutcome};
pub use draft::{DraftField, EditorState, ProductDraft};
pub use error::ClientError;
pub use list::ProductList;
pub use page::ProductsPage;
pub use preview::{Preview, PreviewRegistry};
pub use view::ProductRow;
