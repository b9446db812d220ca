use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::Meal;

/// Direct pass-through onto the meals table. Lists are newest first.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()>;
    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn list_excluding_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn get(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;
    /// Unconditional write of `bought_by`; `false` when the meal does not exist.
    async fn set_bought_by(&self, meal_id: Uuid, buyer_id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, food_name, description, calories, protein,
                               price, address, bought_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(&meal.food_name)
        .bind(&meal.description)
        .bind(&meal.calories)
        .bind(&meal.protein)
        .bind(&meal.price)
        .bind(&meal.address)
        .bind(meal.bought_by)
        .bind(meal.created_at)
        .execute(&self.db)
        .await
        .context("insert meal")?;
        Ok(())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, food_name, description, calories, protein,
                   price, address, bought_by, created_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by owner")?;
        Ok(rows)
    }

    async fn list_excluding_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, food_name, description, calories, protein,
                   price, address, bought_by, created_at
            FROM meals
            WHERE user_id <> $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals excluding owner")?;
        Ok(rows)
    }

    async fn get(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, food_name, description, calories, protein,
                   price, address, bought_by, created_at
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(meal_id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(meal)
    }

    async fn set_bought_by(&self, meal_id: Uuid, buyer_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"UPDATE meals SET bought_by = $2 WHERE id = $1"#)
            .bind(meal_id)
            .bind(buyer_id)
            .execute(&self.db)
            .await
            .context("set bought_by")?;
        Ok(res.rows_affected() > 0)
    }
}

#[derive(Default)]
pub struct MemoryMealRepo {
    meals: RwLock<HashMap<Uuid, Meal>>,
}

impl MemoryMealRepo {
    async fn filtered(&self, keep: impl Fn(&Meal) -> bool) -> Vec<Meal> {
        let meals = self.meals.read().await;
        let mut out: Vec<Meal> = meals.values().filter(|m| keep(m)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl MealRepo for MemoryMealRepo {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()> {
        let mut meals = self.meals.write().await;
        anyhow::ensure!(!meals.contains_key(&meal.id), "duplicate meal id {}", meal.id);
        meals.insert(meal.id, meal.clone());
        Ok(())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        Ok(self.filtered(|m| m.user_id == user_id).await)
    }

    async fn list_excluding_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        Ok(self.filtered(|m| m.user_id != user_id).await)
    }

    async fn get(&self, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        Ok(self.meals.read().await.get(&meal_id).cloned())
    }

    async fn set_bought_by(&self, meal_id: Uuid, buyer_id: Uuid) -> anyhow::Result<bool> {
        match self.meals.write().await.get_mut(&meal_id) {
            Some(meal) => {
                meal.bought_by = Some(buyer_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
