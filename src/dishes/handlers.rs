use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::{
    dto::{Dish, DishSummary},
    services::{dish_details, search_dishes},
};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(search))
        .route("/dishes/:id", get(details))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<DishSummary>> {
    Json(search_dishes(&state, &params.q).await)
}

#[instrument(skip(state))]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Dish>, AppError> {
    dish_details(&state, &id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Dish not found".into()))
}
