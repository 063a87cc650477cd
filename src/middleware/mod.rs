pub mod audit;
pub mod auth;
pub mod csrf;
pub mod error_response;
pub mod rate_limit;

pub use audit::audit_trail;
pub use auth::{extract_bearer_token, require_auth, AuthUser};
pub use csrf::{csrf_protect, CsrfState};
pub use error_response::normalize_error_response;
pub use rate_limit::{rate_limit, RateLimiter};
