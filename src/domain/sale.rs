use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::StringUuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Paid,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Paid => "paid",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "paid" => Ok(SaleStatus::Paid),
            "cancelled" => Ok(SaleStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Sale {
    pub id: StringUuid,
    pub client_id: StringUuid,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sale joined with the owning client's name and email.
/// Clients can be deleted independently, so both are nullable.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct SaleWithClient {
    pub id: StringUuid,
    pub client_id: StringUuid,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
}

/// Raw sale input as received over the wire, before validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SalePayload {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct SaleFilter {
    #[serde(rename = "client")]
    pub client_id: Option<StringUuid>,
    pub status: Option<SaleStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
