//! `PostgreSQL` implementation of the `CatalogReader` trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use courier_core::error::DomainError;
use courier_core::repository::{CatalogReader, ProductSnapshot};

use crate::infrastructure;

/// Catalog reader over the `products` table.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Creates a new `PgCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn get_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        let row: Option<(Uuid, Decimal)> =
            sqlx::query_as("SELECT id, price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| infrastructure(&e))?;
        Ok(row.map(|(id, price)| ProductSnapshot { id, price }))
    }
}
