//! Meal store operations as the clients see them: every failure is logged
//! and collapsed into an empty list, `false` or `None`.

use tracing::{error, info};
use uuid::Uuid;

use super::repo_types::{Meal, MealDraft};
use crate::state::AppState;

/// Lists `draft` under a fresh id owned by `user_id`.
pub async fn add_meal(st: &AppState, user_id: Uuid, draft: MealDraft) -> Option<Meal> {
    let meal = draft.into_meal(Uuid::new_v4(), user_id);
    match st.meals.insert(&meal).await {
        Ok(()) => {
            info!(
                meal_id = %meal.id,
                %user_id,
                kcal = meal.calories_kcal(),
                protein_g = meal.protein_grams(),
                price = meal.price_amount(),
                "meal added"
            );
            Some(meal)
        }
        Err(e) => {
            error!(error = ?e, %user_id, "add meal failed");
            None
        }
    }
}

pub async fn meals_for_user(st: &AppState, user_id: Uuid) -> Vec<Meal> {
    st.meals.list_by_owner(user_id).await.unwrap_or_else(|e| {
        error!(error = ?e, %user_id, "list own meals failed");
        Vec::new()
    })
}

/// Everyone else's meals, bought or not.
pub async fn meals_from_others(st: &AppState, user_id: Uuid) -> Vec<Meal> {
    st.meals.list_excluding_owner(user_id).await.unwrap_or_else(|e| {
        error!(error = ?e, %user_id, "list other meals failed");
        Vec::new()
    })
}

pub async fn meal_by_id(st: &AppState, meal_id: Uuid) -> Option<Meal> {
    st.meals.get(meal_id).await.unwrap_or_else(|e| {
        error!(error = ?e, %meal_id, "get meal failed");
        None
    })
}

/// Last writer wins: an existing buyer is overwritten.
pub async fn mark_meal_as_bought(st: &AppState, meal_id: Uuid, buyer_id: Uuid) -> bool {
    match st.meals.set_bought_by(meal_id, buyer_id).await {
        Ok(true) => {
            info!(%meal_id, %buyer_id, "meal marked as bought");
            true
        }
        Ok(false) => {
            error!(%meal_id, %buyer_id, "mark as bought on missing meal");
            false
        }
        Err(e) => {
            error!(error = ?e, %meal_id, %buyer_id, "mark as bought failed");
            false
        }
    }
}
