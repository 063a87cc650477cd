//! OpenAPI document served at /api-docs/openapi.json and browsable
//! through Swagger UI at /docs.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api;
use crate::domain;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BizFlow API",
        description = "Clients, sales, products and reporting for small businesses",
        license(name = "MIT")
    ),
    paths(
        api::health::health,
        api::auth::register,
        api::auth::login,
        api::auth::refresh,
        api::auth::logout,
        api::auth::me,
        api::client::list_clients,
        api::client::get_client,
        api::client::create_client,
        api::client::update_client,
        api::client::delete_client,
        api::sale::list_sales,
        api::sale::get_sale,
        api::sale::create_sale,
        api::sale::update_sale,
        api::sale::delete_sale,
        api::product::list_products,
        api::product::get_product,
        api::product::create_product,
        api::product::update_product,
        api::product::delete_product,
        api::product::update_stock,
        api::report::summary,
        api::report::top_clients,
        api::report::trends,
        api::report::by_industry,
        api::report::export,
    ),
    components(schemas(
        domain::user::RegisterPayload,
        domain::user::LoginPayload,
        domain::user::RefreshPayload,
        domain::user::TokenPair,
        domain::user::AuthResponse,
        domain::user::AccessTokenResponse,
        domain::user::UserProfile,
        domain::user::UserRole,
        domain::client::Client,
        domain::client::ClientPayload,
        domain::client::Industry,
        domain::sale::Sale,
        domain::sale::SaleWithClient,
        domain::sale::SalePayload,
        domain::sale::SaleStatus,
        domain::product::Product,
        domain::product::ProductPayload,
        domain::product::Category,
        domain::product::StockOperation,
        domain::product::StockUpdatePayload,
        domain::report::SummaryReport,
        domain::report::MonthlyTotal,
        domain::report::StatusTotal,
        domain::report::TopClient,
        domain::report::PeriodTotals,
        domain::report::TrendChange,
        domain::report::TrendsReport,
        domain::report::IndustryTotal,
        api::PageMeta,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, login and tokens"),
        (name = "clients", description = "Client directory"),
        (name = "sales", description = "Sales records"),
        (name = "products", description = "Product catalog and stock"),
        (name = "reports", description = "Aggregated reporting and export"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/reports/export"));
        assert!(json.contains("bearer_jwt"));
    }
}
