use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::{ApiResponse, PaginationQuery};
use crate::domain::{SaleFilter, SalePayload, StringUuid};
use crate::error::Result;
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "sales",
    params(PaginationQuery, SaleFilter),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Page of sales with client info"))
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<SaleFilter>,
) -> Result<impl IntoResponse> {
    let (sales, total) = state
        .sales
        .list(filter, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::paginated(sales, pagination.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Sale"),
        (status = 404, description = "Unknown sale")
    )
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let sale = state.sales.get(id).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "sales",
    request_body = SalePayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Sale created"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown client")
    )
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse> {
    let sale = state.sales.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sale))))
}

#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale id")),
    request_body = SalePayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Sale updated"),
        (status = 404, description = "Unknown sale or client")
    )
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse> {
    let sale = state.sales.update(id, payload).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Sale deleted"),
        (status = 404, description = "Unknown sale")
    )
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.sales.delete(id).await?;
    Ok(Json(ApiResponse::message("sale deleted")))
}
