use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::domain::{Product, ProductFilter, StringUuid};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<()>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>>;
    async fn list(&self, filter: &ProductFilter, offset: i64, limit: i64)
        -> Result<Vec<Product>>;
    async fn count(&self, filter: &ProductFilter) -> Result<i64>;
    async fn update(&self, product: &Product) -> Result<()>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;
    async fn set_stock(&self, id: StringUuid, stock: i64) -> Result<()>;
}

pub struct ProductRepositoryImpl {
    pool: MySqlPool,
}

impl ProductRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(filter: &ProductFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, category, sku, stock, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category)
        .bind(&product.sku)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>> {
        let pattern = like_pattern(filter);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE (? IS NULL OR category = ?)
              AND (? IS NULL OR is_active = ?)
              AND (? IS NULL OR name LIKE ? OR sku LIKE ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(filter.category)
        .bind(filter.category)
        .bind(filter.is_active)
        .bind(filter.is_active)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn count(&self, filter: &ProductFilter) -> Result<i64> {
        let pattern = like_pattern(filter);
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM products
            WHERE (? IS NULL OR category = ?)
              AND (? IS NULL OR is_active = ?)
              AND (? IS NULL OR name LIKE ? OR sku LIKE ?)
            "#,
        )
        .bind(filter.category)
        .bind(filter.category)
        .bind(filter.is_active)
        .bind(filter.is_active)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, category = ?, sku = ?,
                stock = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category)
        .bind(&product.sku)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.updated_at)
        .bind(product.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_stock(&self, id: StringUuid, stock: i64) -> Result<()> {
        sqlx::query("UPDATE products SET stock = ? WHERE id = ?")
            .bind(stock)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
