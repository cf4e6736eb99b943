use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use shopdeck_core::DomainError;
use shopdeck_infra::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> Response {
    match err {
        CatalogError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CatalogError::NotFound => not_found(),
        CatalogError::Storage(detail) => {
            tracing::error!(error = %detail, "catalog storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "the catalog could not be updated; try again later",
            )
        }
    }
}

/// Errors raised while reading a request body, before the service is involved.
pub fn domain_error_to_response(err: DomainError) -> Response {
    catalog_error_to_response(err.into())
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        let validation = catalog_error_to_response(CatalogError::Validation("price is required".into()));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        assert_eq!(
            catalog_error_to_response(CatalogError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            catalog_error_to_response(CatalogError::Storage("disk full".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_errors_are_bad_requests() {
        let resp = domain_error_to_response(DomainError::validation("category is required"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
