use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{SearchParams, SearchResponse};
use crate::{auth::services::AuthUser, error::AppError, state::AppState};

const DEFAULT_PAGE_SIZE: u32 = 1;
const MAX_PAGE_SIZE: u32 = 200;

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_foods))
}

fn parse_page_size(raw: Option<&str>) -> Result<u32, AppError> {
    match raw {
        None | Some("") => Ok(DEFAULT_PAGE_SIZE),
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
            .ok_or_else(|| AppError::bad_request("Invalid pageSize parameter")),
    }
}

#[instrument(skip(state, params))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params?;
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing query parameter"))?;
    let page_size = parse_page_size(params.page_size.as_deref())?;

    let results = state
        .food_search
        .search(query, page_size)
        .await
        .map_err(AppError::internal("USDA search failed"))?;

    info!(%user_id, query, hits = results.len(), "food search");
    Ok(Json(SearchResponse { results }))
}
