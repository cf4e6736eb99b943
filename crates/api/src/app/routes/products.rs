use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};

use shopdeck_products::ProductId;

use crate::app::dto::{self, DeletedResponse, ProductListResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.catalog.list().await {
        Ok(products) => Json(ProductListResponse { products }).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match dto::read_product_form(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.catalog.create(form).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A malformed id cannot name a stored product.
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::not_found();
    };

    let form = match dto::read_product_form(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.catalog.update(id, form).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::not_found();
    };

    match services.catalog.delete(id).await {
        Ok(()) => Json(DeletedResponse {}).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
