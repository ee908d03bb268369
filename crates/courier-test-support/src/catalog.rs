//! Test catalogs: `CatalogReader` implementations for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use courier_core::error::DomainError;
use courier_core::repository::{CatalogReader, ProductSnapshot};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A catalog backed by a fixed price list.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    prices: HashMap<Uuid, Decimal>,
}

impl StaticCatalog {
    /// Creates a catalog with the given `(product_id, price)` entries.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (Uuid, Decimal)>) -> Self {
        Self {
            prices: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CatalogReader for StaticCatalog {
    async fn get_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        Ok(self.prices.get(&product_id).map(|price| ProductSnapshot {
            id: product_id,
            price: *price,
        }))
    }
}

/// A catalog that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingCatalog;

#[async_trait]
impl CatalogReader for FailingCatalog {
    async fn get_product(&self, _product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        Err(DomainError::Infrastructure("catalog unavailable".into()))
    }
}
