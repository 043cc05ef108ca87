mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
mod services;
pub mod summary;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::diary_routes()
}
