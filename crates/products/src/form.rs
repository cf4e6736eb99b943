//! Multipart form shape shared by the admin client and the gateway, plus its
//! validation into typed create/update requests.
//!
//! Validation stops at the first violation and never touches storage.

use core::str::FromStr;

use rust_decimal::Decimal;
use shopdeck_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::image::ImageUpload;
use crate::product::MAX_IMAGES;

/// Untyped form fields as they travel over the wire.
///
/// `None` means the field was absent from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub category: Option<String>,
    pub images: Vec<ImageUpload>,
}

/// Fully validated fields of a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: Option<String>,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.description.is_none()
    }
}

/// Validated create request: fields plus 1..=3 images still to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProduct {
    pub fields: ProductFields,
    pub images: Vec<ImageUpload>,
}

/// Validated update request. `images: Some(_)` replaces the full image set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProduct {
    pub changes: FieldChanges,
    pub images: Option<Vec<ImageUpload>>,
}

impl ProductForm {
    /// Record a text field by its wire name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "price" => self.price = Some(value),
            "stock" => self.stock = Some(value),
            "category" => self.category = Some(value),
            _ => {}
        }
    }

    /// Attach an image, refusing the one that would exceed [`MAX_IMAGES`].
    ///
    /// Empty file parts (a file input submitted with nothing selected) are
    /// skipped rather than rejected.
    pub fn push_image(&mut self, image: ImageUpload) -> DomainResult<()> {
        if image.is_empty() && image.file_name.is_empty() {
            return Ok(());
        }
        if self.images.len() >= MAX_IMAGES {
            return Err(too_many_images());
        }
        if !image.is_image() {
            return Err(DomainError::validation(format!(
                "{:?} is not an image (content type {:?})",
                image.file_name, image.content_type
            )));
        }
        if image.is_empty() {
            return Err(DomainError::validation(format!(
                "image {:?} is empty",
                image.file_name
            )));
        }
        self.images.push(image);
        Ok(())
    }

    /// Text fields in wire order, skipping absent ones.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("price", &self.price),
            ("stock", &self.stock),
            ("category", &self.category),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
        .collect()
    }

    pub fn into_create(self) -> DomainResult<CreateProduct> {
        let name = required_text("name", self.name)?;
        let description = required_text("description", self.description)?;
        let price = parse_price(&required_text("price", self.price)?)?;
        let stock = parse_stock(&required_text("stock", self.stock)?)?;
        let category = Category::from_str(&required_text("category", self.category)?)?;
        let images = image_set(self.images)?.ok_or_else(|| {
            DomainError::validation("at least one image is required")
        })?;

        Ok(CreateProduct {
            fields: ProductFields {
                name,
                category,
                price,
                stock,
                description,
            },
            images,
        })
    }

    pub fn into_update(self) -> DomainResult<UpdateProduct> {
        let name = self.name.map(|v| present_text("name", v)).transpose()?;
        let description = self
            .description
            .map(|v| present_text("description", v))
            .transpose()?;
        let price = self
            .price
            .map(|v| present_text("price", v).and_then(|v| parse_price(&v)))
            .transpose()?;
        let stock = self
            .stock
            .map(|v| present_text("stock", v).and_then(|v| parse_stock(&v)))
            .transpose()?;
        let category = self
            .category
            .map(|v| present_text("category", v).and_then(|v| Category::from_str(&v)))
            .transpose()?;
        let images = image_set(self.images)?;

        Ok(UpdateProduct {
            changes: FieldChanges {
                name,
                category,
                price,
                stock,
                description,
            },
            images,
        })
    }
}

/// Most decimal places a price may carry (cents).
pub const MAX_PRICE_SCALE: u32 = 2;

/// Largest accepted price. Prices travel as JSON numbers, and fifteen
/// significant digits is what an `f64` carries without loss.
pub const MAX_PRICE: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Parse a non-negative decimal price such as `"19.99"`.
///
/// At most [`MAX_PRICE_SCALE`] decimal places and at most [`MAX_PRICE`];
/// trailing zeros do not count against the scale.
pub fn parse_price(raw: &str) -> DomainResult<Decimal> {
    let raw = raw.trim();
    let price = Decimal::from_str(raw)
        .map_err(|_| DomainError::validation(format!("price must be a number (got {raw:?})")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price cannot be negative"));
    }
    let price = price.normalize();
    if price.scale() > MAX_PRICE_SCALE {
        return Err(DomainError::validation(format!(
            "price can have at most {MAX_PRICE_SCALE} decimal places (got {raw:?})"
        )));
    }
    if price > MAX_PRICE {
        return Err(DomainError::validation(format!(
            "price cannot exceed {MAX_PRICE} (got {raw:?})"
        )));
    }
    Ok(price)
}

/// Parse a non-negative whole stock quantity such as `"10"`.
pub fn parse_stock(raw: &str) -> DomainResult<u32> {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    raw.parse::<u32>().map_err(|_| {
        DomainError::validation(format!("stock must be a whole number (got {raw:?})"))
    })
}

fn required_text(field: &str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) => present_text(field, v),
        None => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn present_text(field: &str, value: String) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value)
}

fn image_set(images: Vec<ImageUpload>) -> DomainResult<Option<Vec<ImageUpload>>> {
    match images.len() {
        0 => Ok(None),
        n if n > MAX_IMAGES => Err(too_many_images()),
        _ => Ok(Some(images)),
    }
}

fn too_many_images() -> DomainError {
    DomainError::validation(format!("at most {MAX_IMAGES} images are allowed"))
}
