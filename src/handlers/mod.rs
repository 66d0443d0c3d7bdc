/// HTTP request handlers
use crate::catalog::CatalogFilter;
use crate::domain::Health;
use crate::errors::{ApiError, ApiResult};
use crate::services::{PlanRequest, PlannerService};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlannerService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Debug, Deserialize)]
pub struct ObserverQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub ra: f64,
    pub dec: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub time: Option<String>,
}

#[derive(Serialize)]
struct Objects<T: Serialize> {
    objects: T,
}

/// Malformed query strings get the same envelope as every other error
fn query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::InvalidInput(e.body_text()))
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Ranked targets for an observer
pub async fn get_targets(
    State(state): State<AppState>,
    params: Result<Query<PlanRequest>, QueryRejection>,
) -> ApiResult<Response> {
    let req = query(params)?;
    let plan = state.service.plan(&req).await?;
    Ok(Json(SuccessResponse::new(plan)).into_response())
}

/// Lunar phase and position
pub async fn get_moon(
    State(state): State<AppState>,
    params: Result<Query<ObserverQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let q = query(params)?;
    let report = state.service.moon(q.lat, q.lon, q.time.as_deref())?;
    Ok(Json(SuccessResponse::new(report)).into_response())
}

/// Alt/az for arbitrary coordinates
pub async fn get_position(
    State(state): State<AppState>,
    params: Result<Query<PositionQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let q = query(params)?;
    let report = state
        .service
        .position(q.ra, q.dec, q.lat, q.lon, q.time.as_deref())?;
    Ok(Json(SuccessResponse::new(report)).into_response())
}

/// Filtered catalog listing
pub async fn list_catalog(
    State(state): State<AppState>,
    params: Result<Query<CatalogFilter>, QueryRejection>,
) -> ApiResult<Response> {
    let filter = query(params)?;
    let objects = state.service.list_catalog(&filter);
    Ok(Json(SuccessResponse::new(Objects { objects })).into_response())
}

pub async fn get_object(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let object = state.service.object(&id)?;
    Ok(Json(SuccessResponse::new(object)).into_response())
}
