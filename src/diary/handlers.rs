use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{DateQuery, EntriesResponse, LogFoodRequest, MessageResponse},
    repo,
    repo_types::DailySummary,
    services, summary,
};
use crate::{auth::services::AuthUser, error::AppError, state::AppState};

pub fn diary_routes() -> Router<AppState> {
    Router::new()
        .route("/diary", get(list_entries).post(log_food))
        .route("/diary/summary", get(daily_summary))
}

/// POST /diary { food: {name, calories, protein, carbs, fat}, date, quantity? }
#[instrument(skip(state, payload))]
pub async fn log_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<LogFoodRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    let entry = payload.validate()?;

    let entry_id = services::log_food(&state.db, user_id, &entry)
        .await
        .map_err(AppError::internal("Failed to log food"))?;

    info!(user_id, entry_id, food = %entry.food.name, date = %entry.date, "food logged");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Food entry logged!".into(),
        }),
    ))
}

/// GET /diary?date=YYYY-MM-DD
#[instrument(skip(state, query))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<EntriesResponse>, AppError> {
    let Query(q) = query?;
    let date = q.date()?;
    let entries = repo::list_by_date(&state.db, user_id, date)
        .await
        .map_err(AppError::internal("Failed to fetch diary"))?;
    Ok(Json(EntriesResponse { entries }))
}

/// GET /diary/summary?date=YYYY-MM-DD
#[instrument(skip(state, query))]
pub async fn daily_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<DailySummary>, AppError> {
    let Query(q) = query?;
    let date = q.date()?;
    let summary = summary::summarize(&state.db, user_id, date)
        .await
        .map_err(AppError::internal("Failed to calculate daily summary"))?;
    Ok(Json(summary))
}
