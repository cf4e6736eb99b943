//! Transport to the catalog gateway.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use shopdeck_products::{Product, ProductForm, ProductId};

use crate::error::ClientError;

/// The gateway operations the admin page needs.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;

    async fn create_product(&self, form: ProductForm) -> Result<Product, ClientError>;

    async fn update_product(&self, id: ProductId, form: ProductForm)
    -> Result<Product, ClientError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ProductListBody {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `CatalogApi` over HTTP (JSON responses, multipart mutations).
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach a bearer token issued by the identity provider.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        matches!(self.client.get(&url).send().await, Ok(resp) if resp.status().is_success())
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(status_error(resp).await)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self
            .send(self.request(reqwest::Method::GET, "/products"))
            .await?;
        let body: ProductListBody = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.products)
    }

    async fn create_product(&self, form: ProductForm) -> Result<Product, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/products")
            .multipart(multipart_body(form)?);
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn update_product(
        &self,
        id: ProductId,
        form: ProductForm,
    ) -> Result<Product, ClientError> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/products/{id}"))
            .multipart(multipart_body(form)?);
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        self.send(self.request(reqwest::Method::DELETE, &format!("/products/{id}")))
            .await?;
        Ok(())
    }
}

/// Text fields in wire order, then one `images` part per staged file.
fn multipart_body(form: ProductForm) -> Result<Form, ClientError> {
    let mut body = Form::new();
    for (name, value) in form.text_fields() {
        body = body.text(name, value.to_string());
    }
    for image in form.images {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ClientError::Validation(format!("invalid image content type: {e}")))?;
        body = body.part("images", part);
    }
    Ok(body)
}

async fn status_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    classify_status(status, &text)
}

fn classify_status(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::NOT_FOUND => ClientError::NotFound,
        s if s.is_server_error() => ClientError::Storage(message),
        s => ClientError::Api(s.as_u16(), body.to_string()),
    }
}
