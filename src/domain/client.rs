use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::StringUuid;

/// Closed set of industries a client can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Industry {
    Technology,
    Retail,
    Health,
    Education,
    Construction,
    Manufacturing,
    #[serde(rename = "Financial Services")]
    #[sqlx(rename = "Financial Services")]
    FinancialServices,
    #[serde(rename = "Food & Beverage")]
    #[sqlx(rename = "Food & Beverage")]
    FoodAndBeverage,
    Tourism,
    Transport,
    Services,
    Hospitality,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 13] = [
        Industry::Technology,
        Industry::Retail,
        Industry::Health,
        Industry::Education,
        Industry::Construction,
        Industry::Manufacturing,
        Industry::FinancialServices,
        Industry::FoodAndBeverage,
        Industry::Tourism,
        Industry::Transport,
        Industry::Services,
        Industry::Hospitality,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Retail => "Retail",
            Industry::Health => "Health",
            Industry::Education => "Education",
            Industry::Construction => "Construction",
            Industry::Manufacturing => "Manufacturing",
            Industry::FinancialServices => "Financial Services",
            Industry::FoodAndBeverage => "Food & Beverage",
            Industry::Tourism => "Tourism",
            Industry::Transport => "Transport",
            Industry::Services => "Services",
            Industry::Hospitality => "Hospitality",
            Industry::Other => "Other",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Industry {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Client {
    pub id: StringUuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<Industry>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw client input as received over the wire, before validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClientPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ClientFilter {
    /// Case-insensitive substring match over name, email and industry.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_industry_parse_multiword() {
        assert_eq!(
            "Financial Services".parse::<Industry>().unwrap(),
            Industry::FinancialServices
        );
        assert_eq!(
            "Food & Beverage".parse::<Industry>().unwrap(),
            Industry::FoodAndBeverage
        );
        assert!("Farming".parse::<Industry>().is_err());
    }

    #[test]
    fn test_industry_serde_matches_display() {
        for industry in Industry::ALL {
            let json = serde_json::to_string(&industry).unwrap();
            assert_eq!(json, format!("\"{}\"", industry));
        }
    }
}
