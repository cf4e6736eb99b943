use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// CORS for the admin SPA: one explicit origin, cookies allowed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_origins_that_are_not_header_values() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
