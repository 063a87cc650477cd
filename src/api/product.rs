use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::{ApiResponse, PaginationQuery};
use crate::domain::{ProductFilter, ProductPayload, StockUpdatePayload, StringUuid};
use crate::error::Result;
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(PaginationQuery, ProductFilter),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Page of products"))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse> {
    let (products, total) = state
        .products
        .list(filter, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::paginated(products, pagination.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Product"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let product = state.products.get(id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductPayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Validation failed or duplicate SKU")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let product = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    request_body = ProductPayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let product = state.products.update(id, payload).await?;
    Ok(Json(ApiResponse::ok(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.products.delete(id).await?;
    Ok(Json(ApiResponse::message("product deleted")))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    request_body = StockUpdatePayload,
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Stock adjusted"),
        (status = 400, description = "Negative quantity"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<StringUuid>,
    Json(payload): Json<StockUpdatePayload>,
) -> Result<impl IntoResponse> {
    let product = state.products.adjust_stock(id, payload).await?;
    Ok(Json(ApiResponse::ok(product)))
}
