use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::domain::{Client, ClientFilter, StringUuid};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: &Client) -> Result<()>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Client>>;
    async fn list(&self, filter: &ClientFilter, offset: i64, limit: i64) -> Result<Vec<Client>>;
    async fn count(&self, filter: &ClientFilter) -> Result<i64>;
    async fn update(&self, client: &Client) -> Result<()>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;
    async fn count_all(&self) -> Result<i64>;
}

pub struct ClientRepositoryImpl {
    pool: MySqlPool,
}

impl ClientRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(filter: &ClientFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

#[async_trait]
impl ClientRepository for ClientRepositoryImpl {
    async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, industry, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.industry)
        .bind(&client.notes)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn list(&self, filter: &ClientFilter, offset: i64, limit: i64) -> Result<Vec<Client>> {
        let pattern = like_pattern(filter);
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE (? IS NULL OR name LIKE ? OR email LIKE ? OR industry LIKE ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    async fn count(&self, filter: &ClientFilter) -> Result<i64> {
        let pattern = like_pattern(filter);
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM clients
            WHERE (? IS NULL OR name LIKE ? OR email LIKE ? OR industry LIKE ?)
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, email = ?, phone = ?, industry = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.industry)
        .bind(&client.notes)
        .bind(client.updated_at)
        .bind(client.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_all(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
