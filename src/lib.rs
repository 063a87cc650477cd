//! BizFlow core: a small-business back office API.
//!
//! Clients, sales and products behind a JWT-authenticated REST API,
//! with aggregated reporting and PDF export.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod openapi;
pub mod pdf;
pub mod repository;
pub mod seed;
pub mod server;
pub mod service;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
