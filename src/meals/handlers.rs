use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::BoughtResponse,
    repo_types::{Meal, MealDraft},
    services::{add_meal, meal_by_id, mark_meal_as_bought, meals_for_user, meals_from_others},
};
use crate::{auth::jwt::AuthUser, error::AppError, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_others))
        .route("/meals/mine", get(list_mine))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id/buy", post(buy_meal))
}

#[instrument(skip(state, draft))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(draft): Json<MealDraft>,
) -> Result<(StatusCode, HeaderMap, Json<Meal>), AppError> {
    let meal = add_meal(&state, user_id, draft)
        .await
        .ok_or_else(|| AppError::Internal("Failed to add meal. Try again.".into()))?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/meals/{}", meal.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(meal)))
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<Meal>> {
    Json(meals_for_user(&state, user_id).await)
}

#[instrument(skip(state))]
pub async fn list_others(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<Meal>> {
    Json(meals_from_others(&state, user_id).await)
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Meal>, AppError> {
    meal_by_id(&state, id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Meal not found".into()))
}

/// The current user becomes the buyer.
#[instrument(skip(state))]
pub async fn buy_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BoughtResponse>, AppError> {
    if !mark_meal_as_bought(&state, id, user_id).await {
        return Err(AppError::Internal("Failed to mark meal as bought".into()));
    }
    Ok(Json(BoughtResponse {
        id,
        bought_by: user_id,
    }))
}
