//! Configuration management for the BizFlow backend

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// CSRF protection configuration
    pub csrf: CsrfConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// JWT signing configuration.
///
/// Access and refresh tokens use distinct secrets when both are set;
/// `refresh_secret` falls back to `secret` otherwise, and verifiers must
/// tolerate either configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub refresh_secret: Option<String>,
    pub issuer: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl JwtConfig {
    /// The secret used for refresh tokens (dedicated one, or the shared
    /// fallback).
    pub fn refresh_secret(&self) -> &str {
        self.refresh_secret.as_deref().unwrap_or(&self.secret)
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins; empty means allow any (development mode)
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Whether the CSRF token check is enforced on mutating requests
    pub enabled: bool,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// General rule applied to all API routes
    pub general: RateLimitRule,
    /// Stricter rule applied to login/register
    pub auth: RateLimitRule,
}

/// Requests allowed per time window
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RateLimitRule {
    pub requests: u64,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            general: RateLimitRule {
                requests: 500,
                window_secs: 900,
            },
            auth: RateLimitRule {
                requests: 20,
                window_secs: 900,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                refresh_secret: env::var("JWT_REFRESH_SECRET").ok(),
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "bizflow".to_string()),
                access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "900".to_string())
                    .parse()
                    .unwrap_or(900),
                refresh_token_ttl_secs: env::var("JWT_REFRESH_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "604800".to_string())
                    .parse()
                    .unwrap_or(604_800),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(|o| o.trim().to_string())
                            .filter(|o| !o.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            csrf: CsrfConfig {
                enabled: env::var("CSRF_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
            rate_limit: {
                let defaults = RateLimitConfig::default();
                RateLimitConfig {
                    enabled: env::var("RATE_LIMIT_ENABLED")
                        .map(|s| s.to_lowercase() == "true")
                        .unwrap_or(false),
                    general: RateLimitRule {
                        requests: env::var("RATE_LIMIT_GENERAL_REQUESTS")
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(defaults.general.requests),
                        window_secs: env::var("RATE_LIMIT_GENERAL_WINDOW_SECS")
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(defaults.general.window_secs),
                    },
                    auth: RateLimitRule {
                        requests: env::var("RATE_LIMIT_AUTH_REQUESTS")
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(defaults.auth.requests),
                        window_secs: env::var("RATE_LIMIT_AUTH_WINDOW_SECS")
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(defaults.auth.window_secs),
                    },
                }
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
