use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::common::StringUuid;
use super::sale::SaleStatus;

/// Revenue total for one calendar month, keyed as "YYYY-MM".
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyTotal {
    pub month: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct StatusTotal {
    pub status: SaleStatus,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// Sum over paid and pending sales. Cancelled sales are excluded.
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
    pub total_sales: i64,
    pub total_clients: i64,
    pub monthly: Vec<MonthlyTotal>,
    pub by_status: Vec<StatusTotal>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub client_id: StringUuid,
    pub client_name: Option<String>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, sqlx::FromRow, ToSchema)]
pub struct PeriodTotals {
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendChange {
    /// Percentage change against the previous period, rounded to 2 decimals.
    /// Zero when the previous period had no activity.
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[schema(value_type = f64)]
    pub count: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendsReport {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub change: TrendChange,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndustryTotal {
    pub industry: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: i64,
    #[schema(value_type = f64)]
    pub average: Decimal,
    /// Share of the grand total, rounded to 2 decimals.
    #[schema(value_type = f64)]
    pub percentage: Decimal,
}
