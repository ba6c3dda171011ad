//! HTTP route handlers.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::{Local, NaiveDate, Utc};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cities::{default_city, find_city, list_cities};
use crate::domain::Language;
use crate::fallback::fallback_times;
use crate::monitoring::{
    LogCategory, LogFilter, LogInput, LogLevel, MetricFilter, MetricInput, MetricKind,
    MetricUnit, MonitorError, SecurityFilter, SecurityInput, export_file_name,
};
use crate::schedule::resolve_schedule;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cities", get(cities))
        .route("/api/cities/:key", get(city))
        .route("/api/prayer-times", get(prayer_times))
        .route("/api/prayer-times/fallback", get(fallback_schedule))
        .route("/api/monitoring", delete(clear_monitoring))
        .route("/api/monitoring/logs", get(list_logs).post(create_log))
        .route("/api/monitoring/metrics", get(list_metrics).post(create_metric))
        .route(
            "/api/monitoring/security",
            get(list_security_events).post(create_security_event),
        )
        .route("/api/monitoring/analytics", get(analytics))
        .route("/api/monitoring/export", get(export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn cities() -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: list_cities().iter().map(CityResult::from_city).collect(),
    })
}

async fn city(Path(key): Path<String>) -> Result<Json<CityResult>, AppError> {
    find_city(&key)
        .map(|c| Json(CityResult::from_city(c)))
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown city: {key}"),
        })
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate, AppError> {
    match date {
        None | Some("") => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date (expected YYYY-MM-DD): {s}"),
        }),
    }
}

fn parse_language(lang: Option<&str>) -> Result<Language, AppError> {
    match lang {
        None | Some("") => Ok(Language::default()),
        Some(s) => s.parse::<Language>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        }),
    }
}

/// Resolve the day's schedule for a city, falling back to static times.
async fn prayer_times(
    State(state): State<AppState>,
    query: Result<Query<PrayerTimesQuery>, QueryRejection>,
) -> Result<Json<PrayerTimesResponse>, AppError> {
    let Query(req) = query?;
    let date = parse_date(req.date.as_deref())?;
    let language = parse_language(req.lang.as_deref())?;
    let city = match req.city.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(key) => find_city(key).ok_or_else(|| AppError::NotFound {
            message: format!("Unknown city: {key}"),
        })?,
        None => default_city(),
    };

    let started = Instant::now();
    let resolved = resolve_schedule(&state.prayers, date, city, language).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    {
        let mut monitor = state.monitor.write().await;
        monitor.record_metric(
            MetricInput::new(MetricKind::ApiCall, elapsed_ms, MetricUnit::Ms).with_details(json!({
                "endpoint": "/api/prayer-times",
                "city": city.english_name,
                "source": resolved.source,
            })),
        );
        if let Some(e) = &resolved.error {
            monitor.log(
                LogInput::new(LogLevel::Warn, LogCategory::System, "prayer_times_fallback")
                    .with_details(json!({
                        "city": city.english_name,
                        "date": date,
                        "error": e,
                    })),
            );
        }
    }

    let now = Local::now();
    let current = (date == now.date_naive())
        .then(|| resolved.schedule.current_prayer(now.time()).cloned())
        .flatten();

    Ok(Json(PrayerTimesResponse {
        city: ScheduleCity::new(city, language),
        date,
        language,
        source: resolved.source,
        current,
        error: resolved.error,
        prayers: resolved.schedule.to_vec(),
    }))
}

async fn fallback_schedule(
    query: Result<Query<FallbackQuery>, QueryRejection>,
) -> Result<Json<FallbackResponse>, AppError> {
    let Query(req) = query?;
    let date = parse_date(req.date.as_deref())?;
    let language = parse_language(req.lang.as_deref())?;

    Ok(Json(FallbackResponse {
        date,
        language,
        prayers: fallback_times(date, language).into_vec(),
    }))
}

// ============================================================================
// Monitoring
// ============================================================================

async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<LogFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = query?;
    Ok(Json(state.monitor.read().await.logs(&filter)))
}

async fn create_log(
    State(state): State<AppState>,
    body: Result<Json<LogInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    let entry = state.monitor.write().await.log(input);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_metrics(
    State(state): State<AppState>,
    query: Result<Query<MetricFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = query?;
    Ok(Json(state.monitor.read().await.metrics(&filter)))
}

async fn create_metric(
    State(state): State<AppState>,
    body: Result<Json<MetricInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    let metric = state.monitor.write().await.record_metric(input);
    Ok((StatusCode::CREATED, Json(metric)))
}

async fn list_security_events(
    State(state): State<AppState>,
    query: Result<Query<SecurityFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = query?;
    Ok(Json(state.monitor.read().await.security_events(&filter)))
}

async fn create_security_event(
    State(state): State<AppState>,
    body: Result<Json<SecurityInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    let event = state.monitor.write().await.record_security_event(input);
    Ok((StatusCode::CREATED, Json(event)))
}

async fn analytics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.monitor.read().await.analytics(Utc::now()))
}

/// Download every record plus analytics as a JSON file.
async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let now = Utc::now();
    let body = state.monitor.read().await.export(now)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_file_name(now)),
            ),
        ],
        body,
    )
        .into_response())
}

async fn clear_monitoring(State(state): State<AppState>) -> StatusCode {
    state.monitor.write().await.clear();
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<MonitorError> for AppError {
    fn from(e: MonitorError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
