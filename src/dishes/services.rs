use tracing::error;

use super::dto::{Dish, DishSummary};
use crate::state::AppState;

/// Summaries of dishes matching `query`; empty on any failure.
pub async fn search_dishes(st: &AppState, query: &str) -> Vec<DishSummary> {
    match st.recipes.search(query).await {
        Ok(dishes) => dishes.into_iter().map(DishSummary::from).collect(),
        Err(e) => {
            error!(error = %e, query, "recipe search failed");
            Vec::new()
        }
    }
}

/// Full dish for the detail view; `None` when missing or on any failure.
pub async fn dish_details(st: &AppState, dish_id: &str) -> Option<Dish> {
    st.recipes.lookup(dish_id).await.unwrap_or_else(|e| {
        error!(error = %e, dish_id, "recipe lookup failed");
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dishes::{client::RecipeClient, fake_catalog::spawn_catalog};

    #[tokio::test]
    async fn search_returns_summaries() {
        let mut st = AppState::fake();
        st.recipes = RecipeClient::new(spawn_catalog().await);
        let found = search_dishes(&st, "arrabiata").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Spicy Arrabiata Penne");
        assert_eq!(found[0].category.as_deref(), Some("Vegetarian"));
    }

    #[tokio::test]
    async fn catalog_failures_degrade() {
        let mut st = AppState::fake();
        st.recipes = RecipeClient::new("http://127.0.0.1:9/");
        assert!(search_dishes(&st, "arrabiata").await.is_empty());
        assert!(dish_details(&st, "52771").await.is_none());
    }
}
