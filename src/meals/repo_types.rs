use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::parse::{int_or_zero, number_or_zero};

/// A meal listed for sale. Nutrition and price stay as the seller typed
/// them; the accessors below give lenient numeric views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub description: String,
    pub calories: String,
    pub protein: String,
    pub price: String,
    pub address: String,
    pub bought_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Meal {
    pub fn calories_kcal(&self) -> i32 {
        int_or_zero(&self.calories)
    }

    pub fn protein_grams(&self) -> f64 {
        number_or_zero(&self.protein)
    }

    pub fn price_amount(&self) -> f64 {
        number_or_zero(&self.price)
    }
}

/// Seller-supplied fields of a new meal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MealDraft {
    pub food_name: String,
    pub description: String,
    pub calories: String,
    pub protein: String,
    pub price: String,
    pub address: String,
}

impl MealDraft {
    pub fn into_meal(self, id: Uuid, user_id: Uuid) -> Meal {
        // timestamptz keeps microseconds
        let now = OffsetDateTime::now_utc();
        let created_at = now.replace_microsecond(now.microsecond()).unwrap_or(now);
        Meal {
            id,
            user_id,
            food_name: self.food_name,
            description: self.description,
            calories: self.calories,
            protein: self.protein,
            price: self.price,
            address: self.address,
            bought_by: None,
            created_at,
        }
    }
}
