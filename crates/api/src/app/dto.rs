use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use shopdeck_products::{ImageUpload, Product, ProductForm};

use crate::app::errors;

/// Multipart part name carrying image files. `images[]` is accepted for
/// clients that use bracketed array naming.
pub const IMAGES_FIELD: &str = "images";

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {}

// -------------------------
// Multipart decoding
// -------------------------

/// Read a product form from a multipart body.
///
/// Image limits are enforced part by part, so a request carrying a fourth
/// image is refused without reading the rest of the body.
pub async fn read_product_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ProductForm, Response> {
    let mut multipart = multipart.map_err(|rejection| {
        errors::json_error(rejection.status(), "invalid_multipart", rejection.body_text())
    })?;

    let mut form = ProductForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGES_FIELD || name == "images[]" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;

            form.push_image(ImageUpload::new(file_name, content_type, bytes.to_vec()))
                .map_err(errors::domain_error_to_response)?;
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set_field(&name, value);
        }
    }

    Ok(form)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> Response {
    let status = err.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "invalid_multipart"
    };
    errors::json_error(status, code, err.body_text())
}
