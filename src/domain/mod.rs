//! Domain models shared across repositories, services and handlers.

pub mod client;
pub mod common;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

pub use client::{Client, ClientFilter, ClientPayload, Industry};
pub use common::StringUuid;
pub use product::{
    Category, Product, ProductFilter, ProductPayload, StockOperation, StockUpdatePayload,
};
pub use report::{
    IndustryTotal, MonthlyTotal, PeriodTotals, StatusTotal, SummaryReport, TopClient, TrendChange,
    TrendsReport,
};
pub use sale::{Sale, SaleFilter, SalePayload, SaleStatus, SaleWithClient};
pub use user::{
    AccessTokenResponse, AuthResponse, LoginPayload, NewUser, RefreshPayload, RegisterPayload,
    TokenPair, User, UserProfile, UserRole,
};
