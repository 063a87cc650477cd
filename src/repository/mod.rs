//! Data access layer. Each repository exposes a trait so services can
//! be unit tested against mocks, with a MySQL implementation behind it.

pub mod client;
pub mod product;
pub mod sale;
pub mod user;

pub use client::{ClientRepository, ClientRepositoryImpl};
pub use product::{ProductRepository, ProductRepositoryImpl};
pub use sale::{DateRange, SaleRepository, SaleRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl};

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
