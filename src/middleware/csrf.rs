//! Double-submit CSRF protection for authenticated routes.
//!
//! Every response carries a fresh token in `X-CSRF-Token`; mutating
//! requests must echo the last issued token back in the same header.
//! Tokens are keyed per user and live in a [`KeyedStore`], which the
//! server clears on an hourly schedule.

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use rand::RngCore;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::client_key;
use crate::store::{KeyedStore, MemoryStore};

pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

#[derive(Clone)]
pub struct CsrfState {
    store: MemoryStore<String>,
    enabled: bool,
}

impl CsrfState {
    pub fn new(enabled: bool) -> Self {
        CsrfState {
            store: MemoryStore::new(),
            enabled,
        }
    }

    pub fn store(&self) -> &MemoryStore<String> {
        &self.store
    }

    /// Mints the first token of a session so the login/register
    /// response already carries one and the client's first mutating
    /// request does not need a prior GET.
    pub fn bootstrap(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        Some(self.issue(key))
    }

    fn issue(&self, key: &str) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.store.set(key, token.clone());
        token
    }

    fn validate(&self, key: &str, presented: Option<&str>) -> bool {
        match (self.store.get(key), presented) {
            (Some(stored), Some(presented)) => stored == presented,
            _ => false,
        }
    }
}

pub async fn csrf_protect(
    State(state): State<crate::server::AppState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let csrf = &state.csrf;
    if !csrf.enabled {
        return Ok(next.run(req).await);
    }

    let key = req
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.user_id.to_string())
        .unwrap_or_else(|| client_key(req.headers()));

    let method = req.method();
    let mutating = method != Method::GET && method != Method::HEAD && method != Method::OPTIONS;
    if mutating {
        let presented = req
            .headers()
            .get(&CSRF_HEADER)
            .and_then(|v| v.to_str().ok());
        if !csrf.validate(&key, presented) {
            return Err(AppError::Forbidden("invalid CSRF token".into()));
        }
    }

    let token = csrf.issue(&key);
    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&token) {
        response.headers_mut().insert(CSRF_HEADER, value);
    }
    Ok(response)
}
