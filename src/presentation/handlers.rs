// HTTP request handlers
use crate::domain::dataset::{DashboardFilters, DataSourceType, DEFAULT_RANGE_DAYS};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    /// Missing bounds fall back to the default range ending `today`
    pub fn to_filters(&self, source: DataSourceType, today: NaiveDate) -> DashboardFilters {
        let end_date = self.end_date.unwrap_or(today);
        let fallback = DashboardFilters::last_days(source, end_date, DEFAULT_RANGE_DAYS);
        DashboardFilters::new(
            source,
            self.start_date.unwrap_or(fallback.start_date),
            end_date,
        )
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

async fn respond<T: Serialize>(data: &T, status: StatusCode, compress: bool) -> Response<Body> {
    match json_response(data, status, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn error_response(status: StatusCode, message: String, compress: bool) -> Response<Body> {
    respond(&ErrorBody { error: message }, status, compress).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List selectable data sources
pub async fn list_sources(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);
    respond(&state.dataset_service.list_sources(), StatusCode::OK, compress).await
}

/// Raw dataset for a source and date range
pub async fn get_dataset(
    Path(source): Path<String>,
    Query(range): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let source = match source.parse::<DataSourceType>() {
        Ok(source) => source,
        Err(e) => return error_response(StatusCode::NOT_FOUND, e.to_string(), compress).await,
    };
    let filters = range.to_filters(source, Utc::now().date_naive());

    match state.dataset_service.load_dataset(&filters).await {
        Ok(dataset) => respond(&dataset, StatusCode::OK, compress).await,
        Err(e) => {
            tracing::error!("Error loading dataset: {:#}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string(), compress).await
        }
    }
}

/// KPIs and chart series for a source and date range
pub async fn get_dashboard(
    Path(source): Path<String>,
    Query(range): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let source = match source.parse::<DataSourceType>() {
        Ok(source) => source,
        Err(e) => return error_response(StatusCode::NOT_FOUND, e.to_string(), compress).await,
    };
    let filters = range.to_filters(source, Utc::now().date_naive());

    match state.dashboard_service.get_dashboard(&filters).await {
        Ok(dashboard) => respond(&dashboard, StatusCode::OK, compress).await,
        Err(e) => {
            tracing::error!("Error building dashboard: {:#}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string(), compress).await
        }
    }
}
