use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::{ApiResponse, PaginationQuery};
use crate::domain::{ClientFilter, ClientPayload, StringUuid};
use crate::error::Result;
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "clients",
    params(PaginationQuery, ClientFilter),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Page of clients"))
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<ClientFilter>,
) -> Result<impl IntoResponse> {
    let (clients, total) = state
        .clients
        .list(filter, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::paginated(clients, pagination.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Client"),
        (status = 404, description = "Unknown client")
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let client = state.clients.get(id).await?;
    Ok(Json(ApiResponse::ok(client)))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "clients",
    request_body = ClientPayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Client created"),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse> {
    let client = state.clients.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(client))))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    request_body = ClientPayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Client updated"),
        (status = 404, description = "Unknown client")
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse> {
    let client = state.clients.update(id, payload).await?;
    Ok(Json(ApiResponse::ok(client)))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 404, description = "Unknown client")
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.clients.delete(id).await?;
    Ok(Json(ApiResponse::message("client deleted")))
}
