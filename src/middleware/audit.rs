//! Audit trail for successful mutations on authenticated routes.
//!
//! Emits structured events under the `audit` target so they can be
//! routed separately from application logs via the env filter.

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::auth::AuthUser;

pub async fn audit_trail(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user_id = req.extensions().get::<AuthUser>().map(|u| u.user_id);

    let response = next.run(req).await;

    let mutating = method != Method::GET && method != Method::HEAD && method != Method::OPTIONS;
    if mutating && response.status().is_success() {
        tracing::info!(
            target: "audit",
            %method,
            path,
            user_id = user_id.map(|id| id.to_string()),
            status = response.status().as_u16(),
            "mutation"
        );
    }
    response
}
