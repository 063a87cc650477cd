use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::domain::{
    MonthlyTotal, PeriodTotals, Sale, SaleFilter, SaleWithClient, StatusTotal, StringUuid,
    TopClient,
};
use crate::error::Result;

/// Inclusive date bounds applied to report aggregates; `None` leaves
/// that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Raw per-industry aggregate row. The service layer derives averages
/// and percentages from these.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IndustryRow {
    pub industry: Option<String>,
    pub total: Decimal,
    pub count: i64,
}

const SALE_WITH_CLIENT: &str = r#"
    SELECT s.id, s.client_id, s.amount, s.description, s.date, s.status,
           s.created_at, s.updated_at, c.name AS client_name, c.email AS client_email
    FROM sales s
    LEFT JOIN clients c ON c.id = s.client_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn create(&self, sale: &Sale) -> Result<()>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<SaleWithClient>>;
    async fn list(
        &self,
        filter: &SaleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SaleWithClient>>;
    async fn count(&self, filter: &SaleFilter) -> Result<i64>;
    async fn update(&self, sale: &Sale) -> Result<()>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;

    /// All non-cancelled sales in a date range, oldest first.
    async fn list_for_export(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SaleWithClient>>;

    /// Revenue and count over paid and pending sales in an optional
    /// date range.
    async fn totals_overall(&self, range: DateRange) -> Result<PeriodTotals>;
    async fn totals_by_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal>>;
    async fn totals_by_status(&self, range: DateRange) -> Result<Vec<StatusTotal>>;
    async fn top_clients(&self, limit: i64) -> Result<Vec<TopClient>>;
    async fn period_totals(&self, from: DateTime<Utc>, to: DateTime<Utc>)
        -> Result<PeriodTotals>;
    async fn totals_by_industry(&self, range: DateRange) -> Result<Vec<IndustryRow>>;
}

pub struct SaleRepositoryImpl {
    pool: MySqlPool,
}

impl SaleRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleRepository for SaleRepositoryImpl {
    async fn create(&self, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sales (id, client_id, amount, description, date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id)
        .bind(sale.client_id)
        .bind(sale.amount)
        .bind(&sale.description)
        .bind(sale.date)
        .bind(sale.status)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<SaleWithClient>> {
        let sale = sqlx::query_as::<_, SaleWithClient>(&format!(
            "{SALE_WITH_CLIENT} WHERE s.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    async fn list(
        &self,
        filter: &SaleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SaleWithClient>> {
        let sales = sqlx::query_as::<_, SaleWithClient>(&format!(
            r#"
            {SALE_WITH_CLIENT}
            WHERE (? IS NULL OR s.client_id = ?)
              AND (? IS NULL OR s.status = ?)
              AND (? IS NULL OR s.date >= ?)
              AND (? IS NULL OR s.date <= ?)
            ORDER BY s.date DESC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(filter.client_id)
        .bind(filter.client_id)
        .bind(filter.status)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    async fn count(&self, filter: &SaleFilter) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM sales s
            WHERE (? IS NULL OR s.client_id = ?)
              AND (? IS NULL OR s.status = ?)
              AND (? IS NULL OR s.date >= ?)
              AND (? IS NULL OR s.date <= ?)
            "#,
        )
        .bind(filter.client_id)
        .bind(filter.client_id)
        .bind(filter.status)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE sales
            SET client_id = ?, amount = ?, description = ?, date = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(sale.client_id)
        .bind(sale.amount)
        .bind(&sale.description)
        .bind(sale.date)
        .bind(sale.status)
        .bind(sale.updated_at)
        .bind(sale.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_export(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SaleWithClient>> {
        let sales = sqlx::query_as::<_, SaleWithClient>(&format!(
            r#"
            {SALE_WITH_CLIENT}
            WHERE s.date >= ? AND s.date <= ? AND s.status <> 'cancelled'
            ORDER BY s.date ASC
            "#
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    async fn totals_overall(&self, range: DateRange) -> Result<PeriodTotals> {
        let totals = sqlx::query_as::<_, PeriodTotals>(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
            FROM sales
            WHERE status IN ('paid', 'pending')
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            "#,
        )
        .bind(range.from)
        .bind(range.from)
        .bind(range.to)
        .bind(range.to)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn totals_by_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal>> {
        let rows = sqlx::query_as::<_, MonthlyTotal>(
            r#"
            SELECT DATE_FORMAT(date, '%Y-%m') AS month,
                   COALESCE(SUM(amount), 0) AS total,
                   COUNT(*) AS count
            FROM sales
            WHERE date >= ? AND status IN ('paid', 'pending')
            GROUP BY month
            ORDER BY month ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn totals_by_status(&self, range: DateRange) -> Result<Vec<StatusTotal>> {
        let rows = sqlx::query_as::<_, StatusTotal>(
            r#"
            SELECT status, COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
            FROM sales
            WHERE (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            GROUP BY status
            "#,
        )
        .bind(range.from)
        .bind(range.from)
        .bind(range.to)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn top_clients(&self, limit: i64) -> Result<Vec<TopClient>> {
        let rows = sqlx::query_as::<_, TopClient>(
            r#"
            SELECT s.client_id, c.name AS client_name,
                   COALESCE(SUM(s.amount), 0) AS total, COUNT(*) AS count
            FROM sales s
            LEFT JOIN clients c ON c.id = s.client_id
            WHERE s.status IN ('paid', 'pending')
            GROUP BY s.client_id, c.name
            ORDER BY total DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn period_totals(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<PeriodTotals> {
        let totals = sqlx::query_as::<_, PeriodTotals>(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
            FROM sales
            WHERE date >= ? AND date < ? AND status IN ('paid', 'pending')
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn totals_by_industry(&self, range: DateRange) -> Result<Vec<IndustryRow>> {
        let rows = sqlx::query_as::<_, IndustryRow>(
            r#"
            SELECT c.industry, COALESCE(SUM(s.amount), 0) AS total, COUNT(*) AS count
            FROM sales s
            LEFT JOIN clients c ON c.id = s.client_id
            WHERE s.status IN ('paid', 'pending')
              AND (? IS NULL OR s.date >= ?)
              AND (? IS NULL OR s.date <= ?)
            GROUP BY c.industry
            ORDER BY total DESC
            "#,
        )
        .bind(range.from)
        .bind(range.from)
        .bind(range.to)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
