//! Sliding window rate limiting keyed by client address.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::RateLimitRule;
use crate::store::{KeyedStore, MemoryStore};

// Drop all buckets once the map grows past this, instead of tracking
// per-bucket expiry.
const MAX_TRACKED_KEYS: usize = 10_000;

#[derive(Clone)]
pub struct RateLimiter {
    buckets: MemoryStore<Vec<u64>>,
    max_requests: u64,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(rule: &RateLimitRule) -> Self {
        RateLimiter {
            buckets: MemoryStore::new(),
            max_requests: rule.requests,
            window_secs: rule.window_secs,
        }
    }

    /// Records a hit for `key` and reports whether it is still within
    /// the window allowance.
    pub fn check(&self, key: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let cutoff = now.saturating_sub(self.window_secs);

        if self.buckets.len() > MAX_TRACKED_KEYS {
            self.buckets.clear();
        }

        let mut hits = self.buckets.get(key).unwrap_or_default();
        hits.retain(|&t| t > cutoff);
        if hits.len() >= self.max_requests as usize {
            self.buckets.set(key, hits);
            return false;
        }
        hits.push(now);
        self.buckets.set(key, hits);
        true
    }
}

pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(req.headers());
    if !limiter.check(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "error": "Too many requests, please try again later"
            })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitRule {
            requests: max,
            window_secs: 900,
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let l = limiter(3);
        assert!(l.check("1.2.3.4"));
        assert!(l.check("1.2.3.4"));
        assert!(l.check("1.2.3.4"));
        assert!(!l.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let l = limiter(1);
        assert!(l.check("a"));
        assert!(!l.check("a"));
        assert!(l.check("b"));
    }

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1, 10.0.0.2".parse().unwrap());
        assert_eq!(client_key(&headers), "10.0.0.1");
        assert_eq!(client_key(&HeaderMap::new()), "unknown");
    }
}
