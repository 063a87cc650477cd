//! Demo data loader for local development, behind `bizflow-core seed`.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::{ClientPayload, ProductPayload, SalePayload};
use crate::error::Result;
use crate::repository::{ClientRepositoryImpl, ProductRepositoryImpl, SaleRepositoryImpl};
use crate::service::{ClientService, ProductService, SaleService};

const DEMO_CLIENTS: &[(&str, &str, &str, &str)] = &[
    ("Redwood Software", "hello@redwood.example", "+14155550101", "Technology"),
    ("Harbor Foods", "orders@harborfoods.example", "+14155550102", "Food & Beverage"),
    ("Northside Clinic", "admin@northside.example", "+14155550103", "Health"),
    ("Atlas Logistics", "ops@atlaslogistics.example", "+14155550104", "Transport"),
    ("Brightline Academy", "info@brightline.example", "+14155550105", "Education"),
];

const DEMO_PRODUCTS: &[(&str, f64, &str, &str)] = &[
    ("Consulting hour", 120.0, "consulting", "CONS-1"),
    ("Annual license", 990.0, "license", "LIC-1"),
    ("On-site training day", 750.0, "training", "TRAIN-1"),
    ("Maintenance retainer", 350.0, "maintenance", "MAINT-1"),
];

pub async fn run(pool: sqlx::MySqlPool) -> Result<()> {
    let clients = ClientService::new(Arc::new(ClientRepositoryImpl::new(pool.clone())));
    let products = ProductService::new(Arc::new(ProductRepositoryImpl::new(pool.clone())));
    let sales = SaleService::new(
        Arc::new(SaleRepositoryImpl::new(pool.clone())),
        Arc::new(ClientRepositoryImpl::new(pool)),
    );

    let mut client_ids = Vec::new();
    for (name, email, phone, industry) in DEMO_CLIENTS {
        let client = clients
            .create(ClientPayload {
                name: (*name).into(),
                email: Some((*email).into()),
                phone: Some((*phone).into()),
                industry: Some((*industry).into()),
                notes: None,
            })
            .await?;
        client_ids.push(client.id);
        tracing::info!(client = name, "seeded client");
    }

    for (name, price, category, sku) in DEMO_PRODUCTS {
        products
            .create(ProductPayload {
                name: (*name).into(),
                description: None,
                price: *price,
                category: Some((*category).into()),
                sku: Some((*sku).into()),
                stock: Some(25),
                is_active: Some(true),
            })
            .await?;
        tracing::info!(product = name, "seeded product");
    }

    let statuses = ["paid", "paid", "pending", "paid", "cancelled"];
    for (i, client_id) in client_ids.iter().enumerate() {
        for month_back in 0..4_i64 {
            let date = Utc::now() - Duration::days(30 * month_back + i as i64);
            sales
                .create(SalePayload {
                    client_id: client_id.to_string(),
                    amount: 250.0 + (i as f64) * 110.0 + (month_back as f64) * 40.0,
                    description: Some("seeded sale".into()),
                    date: date.to_rfc3339(),
                    status: Some(statuses[(i + month_back as usize) % statuses.len()].into()),
                })
                .await?;
        }
    }
    tracing::info!("seed complete");
    Ok(())
}
