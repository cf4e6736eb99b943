use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopdeck_core::{DocumentId, DomainError, DomainResult, Entity};

use crate::category::Category;
use crate::form::{FieldChanges, ProductFields};
use crate::stock::StockStatus;

/// Upper bound on images attached to one product.
pub const MAX_IMAGES: usize = 3;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub DocumentId);

impl ProductId {
    pub fn new() -> Self {
        Self(DocumentId::new())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<DocumentId>()
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("invalid product id: {s:?}")))
    }
}

/// A persisted catalog product.
///
/// Constructed only through [`Product::create`] (or deserialized from storage),
/// so a value always satisfies: 1..=3 images, non-negative price, non-blank name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Category,
    /// Serialized as a JSON number; `form::parse_price` keeps it within what
    /// round-trips through an `f64` (cents, fifteen digits).
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    stock: u32,
    description: String,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from validated fields and the URLs of its stored images.
    pub fn create(
        id: ProductId,
        fields: ProductFields,
        image_urls: Vec<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_image_set(&image_urls)?;
        ensure_price(fields.price)?;
        ensure_text("name", &fields.name)?;

        Ok(Self {
            id,
            name: fields.name,
            category: fields.category,
            price: fields.price,
            stock: fields.stock,
            description: fields.description,
            images: image_urls,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    ///
    /// Every change is checked before anything is written, so on error `self`
    /// is untouched. `image_urls`, when present, replaces the whole image set.
    pub fn update(
        &mut self,
        changes: FieldChanges,
        image_urls: Option<Vec<String>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(urls) = &image_urls {
            ensure_image_set(urls)?;
        }
        if let Some(price) = changes.price {
            ensure_price(price)?;
        }
        if let Some(name) = &changes.name {
            ensure_text("name", name)?;
        }

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(urls) = image_urls {
            self.images = urls;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_image_set(urls: &[String]) -> DomainResult<()> {
    if urls.is_empty() {
        return Err(DomainError::invariant("a product needs at least one image"));
    }
    if urls.len() > MAX_IMAGES {
        return Err(DomainError::invariant(format!(
            "at most {MAX_IMAGES} images are allowed (got {})",
            urls.len()
        )));
    }
    Ok(())
}

fn ensure_price(price: Decimal) -> DomainResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(())
}

fn ensure_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
