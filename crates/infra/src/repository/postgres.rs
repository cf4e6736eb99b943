//! Postgres-backed product store.
//!
//! Products are kept as JSONB documents keyed by id, mirroring the
//! one-document-per-product model of the catalog:
//!
//! ```sql
//! CREATE TABLE products (
//!     id         UUID PRIMARY KEY,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     document   JSONB NOT NULL
//! );
//! ```
//!
//! Reads and inserts are single statements. `modify` locks the row with
//! `SELECT ... FOR UPDATE` inside a transaction so the mutation sees the
//! document it overwrites.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use shopdeck_products::{Product, ProductId};

use super::{Modified, ModifyError, ProductMutation, ProductRepository, StorageError, sort_products};
use crate::config::ListOrder;

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the `products` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id         UUID PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL,
                document   JSONB NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), err)]
    async fn list(&self, order: ListOrder) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query("SELECT id, document FROM products")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(decode_row(&row)?);
        }
        sort_products(&mut products, order);
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query("SELECT id, document FROM products WHERE id = $1")
            .bind(id.0.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, product), fields(product_id = %product.id_typed()), err)]
    async fn insert(&self, product: &Product) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO products (id, created_at, document) VALUES ($1, $2, $3)")
            .bind(product.id_typed().0.as_uuid())
            .bind(product.created_at())
            .bind(Json(product))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip(self, mutate), fields(product_id = %id), err)]
    async fn modify(
        &self,
        id: ProductId,
        mutate: ProductMutation,
    ) -> Result<Modified, ModifyError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("modify begin", e))?;

        let row = sqlx::query("SELECT id, document FROM products WHERE id = $1 FOR UPDATE")
            .bind(id.0.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("modify select", e))?;
        let before = row.as_ref().map(decode_row).transpose()?.ok_or(ModifyError::NotFound)?;

        // Dropping `tx` on the error paths rolls back and releases the lock.
        let mut after = before.clone();
        mutate(&mut after)?;

        sqlx::query("UPDATE products SET document = $2 WHERE id = $1")
            .bind(id.0.as_uuid())
            .bind(Json(&after))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("modify update", e))?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("modify commit", e))?;

        Ok(Modified { before, after })
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query("DELETE FROM products WHERE id = $1 RETURNING id, document")
            .bind(id.0.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        row.as_ref().map(decode_row).transpose()
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Product, StorageError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode id", e))?;
    let Json(product): Json<Product> = row.try_get("document").map_err(|e| StorageError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    Ok(product)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StorageError {
    StorageError::Backend(format!("{operation}: {err}"))
}
