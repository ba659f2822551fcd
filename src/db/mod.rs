use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{Product, ProductFilters, ProductPayload};

#[cfg(test)]
pub mod memory;

/// Data access for the `products` table. Each call is a single statement, so
/// the store's implicit transaction is the only consistency boundary.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product>;

    async fn find(&self, id: i32) -> AppResult<Option<Product>>;

    async fn list(&self, filters: &ProductFilters) -> AppResult<Vec<Product>>;

    /// Overwrites every mutable column. `None` when no row has this id.
    async fn update(&self, id: i32, payload: &ProductPayload) -> AppResult<Option<Product>>;

    /// `false` when no row has this id.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

// ── Postgres ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, payload: &ProductPayload) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, available, category
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.available)
        .bind(payload.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, available, category
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, filters: &ProductFilters) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, available, category
            FROM products
            WHERE ($1::text IS NULL OR name = $1)
              AND ($2::product_category IS NULL OR category = $2)
              AND ($3::boolean IS NULL OR available = $3)
            ORDER BY id ASC
            "#,
        )
        .bind(filters.name.as_deref())
        .bind(filters.category)
        .bind(filters.available)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update(&self, id: i32, payload: &ProductPayload) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name        = $1,
                description = $2,
                price       = $3,
                available   = $4,
                category    = $5
            WHERE id = $6
            RETURNING id, name, description, price, available, category
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.available)
        .bind(payload.category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
