//! HTTP handlers for the dashboard API

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use crate::refresh::RefreshTask;
use crate::views::{Dashboard, RankRange, ViewError};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    pub refresh: Option<Arc<RefreshTask>>,
}

/// A failed request rendered as a JSON error body
pub enum ApiError {
    View(ViewError),
    /// Query string or body that could not be decoded
    Malformed(StatusCode, String),
}

impl From<ViewError> for ApiError {
    fn from(e: ViewError) -> Self {
        ApiError::View(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Malformed(status, message) => {
                warn!("Malformed request: {}", message);
                (status, message)
            }
            ApiError::View(e @ ViewError::InvalidRange(_)) => {
                warn!("Rejected request: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::View(e @ ViewError::Store(_)) => {
                error!("View failed: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

type QueryParams<T> = Result<Query<T>, QueryRejection>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UniversityQuery {
    pub university: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KeywordQuery {
    pub keyword: String,
    pub n_clicks: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NameQuery {
    pub name: String,
    pub n_clicks: u64,
}

/// Body of the contact update forms
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub name: String,
    pub value: String,
    pub n_clicks: u64,
}

pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let refresh = state.refresh.as_ref().map(|task| {
        json!({
            "range": task.range(),
            "refreshed_at": task.latest().map(|s| s.refreshed_at),
        })
    });
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "refresh": refresh,
    }))
}

// ---- selector options ----

pub async fn universities_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.universities().await)
}

pub async fn university_count_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "count": state.dashboard.university_count().await }))
}

pub async fn interests_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.research_interests().await)
}

pub async fn faculty_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.faculty_names().await)
}

pub async fn document_faculty_handler(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.document_faculty_names().await?))
}

pub async fn keywords_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.keywords().await?))
}

pub async fn titles_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.publication_titles().await?))
}

// ---- charts ----

/// Rankings for a range. The refresh task follows the last requested range.
pub async fn rankings_handler(
    State(state): State<AppState>,
    query: QueryParams<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let default = RankRange::default();
    let range = RankRange::new(
        query.start.unwrap_or(default.start()),
        query.end.unwrap_or(default.end()),
    )?;
    if let Some(task) = &state.refresh {
        task.set_range(range);
    }
    let charts = state.dashboard.top_universities(range).await;
    Ok(Json(json!({ "range": range, "charts": charts })))
}

pub async fn latest_rankings_handler(State(state): State<AppState>) -> Response {
    match state.refresh.as_ref().and_then(|task| task.latest()) {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no ranking refresh has completed" })),
        )
            .into_response(),
    }
}

pub async fn research_areas_handler(
    State(state): State<AppState>,
    query: QueryParams<UniversityQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    Ok(Json(state.dashboard.research_areas(&query.university).await))
}

// ---- panels ----

pub async fn interest_handler(
    State(state): State<AppState>,
    query: QueryParams<KeywordQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let tables = state
        .dashboard
        .research_interest(query.n_clicks, &query.keyword)
        .await;
    Ok(Json(tables))
}

pub async fn contact_handler(
    State(state): State<AppState>,
    query: QueryParams<NameQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    Ok(Json(
        state.dashboard.faculty_contact(query.n_clicks, &query.name).await,
    ))
}

pub async fn faculty_interests_handler(
    State(state): State<AppState>,
    query: QueryParams<NameQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let interests = state.dashboard.faculty_interests(&query.name).await;
    Ok(Json(json!({ "name": query.name, "interests": interests })))
}

pub async fn update_email_handler(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    Ok(Json(
        state
            .dashboard
            .update_email(body.n_clicks, &body.name, &body.value)
            .await,
    ))
}

pub async fn update_phone_handler(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    Ok(Json(
        state
            .dashboard
            .update_phone(body.n_clicks, &body.name, &body.value)
            .await,
    ))
}

pub async fn publications_handler(
    State(state): State<AppState>,
    query: QueryParams<KeywordQuery>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    Ok(Json(
        state
            .dashboard
            .top_publications(query.n_clicks, &query.keyword)
            .await?,
    ))
}
