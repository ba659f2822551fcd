//! In-process stand-in for Postgres used by the handler tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductRepository;
use crate::error::AppResult;
use crate::models::{Product, ProductFilters, ProductPayload};

#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    inner: RwLock<Table>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_row(id: i32, payload: &ProductPayload) -> Product {
    // Mirror NUMERIC(14,2).
    let mut price = payload.price;
    price.rescale(2);

    Product {
        id,
        name: payload.name.clone(),
        description: payload.description.clone(),
        price,
        available: payload.available,
        category: payload.category,
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product> {
        let mut table = self.inner.write().await;
        table.last_id += 1;
        let product = to_row(table.last_id, payload);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, filters: &ProductFilters) -> AppResult<Vec<Product>> {
        let table = self.inner.read().await;
        Ok(table
            .rows
            .values()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, payload: &ProductPayload) -> AppResult<Option<Product>> {
        let mut table = self.inner.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            *row = to_row(id, payload);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
