use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::repository::DateRange;
use crate::server::AppState;
use crate::validation::validate_date;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RangeQuery {
    /// Start of the date range (RFC 3339 or YYYY-MM-DD)
    pub from: Option<String>,
    /// End of the date range (RFC 3339 or YYYY-MM-DD)
    pub to: Option<String>,
}

impl RangeQuery {
    fn parse(&self) -> Result<DateRange> {
        Ok(DateRange {
            from: self
                .from
                .as_deref()
                .map(|d| validate_date("from", d))
                .transpose()?,
            to: self
                .to
                .as_deref()
                .map(|d| validate_date("to", d))
                .transpose()?,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/summary",
    tag = "reports",
    params(RangeQuery),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Dashboard summary"))
)]
pub async fn summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let report = state.reports.summary(range.parse()?).await?;
    Ok(Json(ApiResponse::ok(report)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopClientsQuery {
    /// How many clients to return, default 5
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/reports/top-clients",
    tag = "reports",
    params(TopClientsQuery),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Clients ranked by revenue"))
)]
pub async fn top_clients(
    State(state): State<AppState>,
    Query(query): Query<TopClientsQuery>,
) -> Result<impl IntoResponse> {
    let clients = state.reports.top_clients(query.limit).await?;
    Ok(Json(ApiResponse::ok(clients)))
}

#[utoipa::path(
    get,
    path = "/api/reports/trends",
    tag = "reports",
    params(RangeQuery),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Period-over-period trend"))
)]
pub async fn trends(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let report = state.reports.trends(range.parse()?).await?;
    Ok(Json(ApiResponse::ok(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/by-industry",
    tag = "reports",
    params(RangeQuery),
    security(("bearer_jwt" = [])),
    responses((status = 200, description = "Revenue grouped by client industry"))
)]
pub async fn by_industry(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let report = state.reports.by_industry(range.parse()?).await?;
    Ok(Json(ApiResponse::ok(report)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Output format; only "pdf" is supported
    pub format: Option<String>,
    /// Start of the date range (RFC 3339 or YYYY-MM-DD)
    pub from: Option<String>,
    /// End of the date range (RFC 3339 or YYYY-MM-DD)
    pub to: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/reports/export",
    tag = "reports",
    params(ExportQuery),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, description = "Unsupported format or bad date range")
    )
)]
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let format = query.format.as_deref().unwrap_or("pdf");
    if format != "pdf" {
        return Err(AppError::BadRequest(format!(
            "unsupported export format: {format}"
        )));
    }
    let from = query
        .from
        .as_deref()
        .map(|d| validate_date("from", d))
        .transpose()?;
    let to = query
        .to
        .as_deref()
        .map(|d| validate_date("to", d))
        .transpose()?;

    let bytes = state.reports.export_pdf(from, to).await?;
    Ok((
        [
            (CONTENT_TYPE, "application/pdf"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"sales-report.pdf\"",
            ),
        ],
        bytes,
    ))
}
