//! Business logic, generic over the repository traits so each service
//! can be tested against mocks.

pub mod auth;
pub mod client;
pub mod product;
pub mod report;
pub mod sale;

pub use auth::AuthService;
pub use client::ClientService;
pub use product::ProductService;
pub use report::ReportService;
pub use sale::SaleService;
