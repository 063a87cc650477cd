use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::ApiResponse;
use crate::domain::{LoginPayload, RefreshPayload, RegisterPayload, StringUuid};
use crate::error::Result;
use crate::middleware::csrf::CSRF_HEADER;
use crate::middleware::AuthUser;
use crate::server::AppState;

// Login and register responses carry the session's first CSRF token so
// a mutating request can follow immediately.
fn attach_csrf(state: &AppState, user_id: StringUuid, mut response: Response) -> Response {
    if let Some(token) = state.csrf.bootstrap(&user_id.to_string()) {
        if let Ok(value) = HeaderValue::from_str(&token) {
            response.headers_mut().insert(CSRF_HEADER, value);
        }
    }
    response
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Validation failed or email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let response = state.auth.register(payload).await?;
    let user_id = response.user.id;
    let res = (
        StatusCode::CREATED,
        Json(ApiResponse::with_message(response, "account created")),
    )
        .into_response();
    Ok(attach_csrf(&state, user_id, res))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let response = state.auth.login(payload).await?;
    let user_id = response.user.id;
    let res = Json(ApiResponse::ok(response)).into_response();
    Ok(attach_csrf(&state, user_id, res))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "New access token"),
        (status = 401, description = "Refresh token invalid or revoked")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<impl IntoResponse> {
    let response = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Refresh token revoked"))
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    state.auth.logout(user.user_id.into()).await?;
    Ok(Json(ApiResponse::message("logged out")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Current user profile"))
)]
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<impl IntoResponse> {
    let profile = state.auth.me(user.user_id.into()).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
