use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The catalog numbers its ingredient and measure slots 1 through 20.
const INGREDIENT_SLOTS: usize = 20;

/// A recipe from the external catalog. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<String>,
    pub measures: Vec<String>,
    pub source: Option<String>,
}

/// List-view projection of a [`Dish`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishSummary {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
}

/// Raw catalog envelope; `meals` is `null` when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub meals: Option<Value>,
}

impl CatalogResponse {
    pub(crate) fn into_records(self) -> Vec<Map<String, Value>> {
        match self.meals {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Dish {
    /// Builds a dish from one catalog record. `None` when the record has no
    /// id or name.
    pub fn from_api(record: &Map<String, Value>) -> Option<Self> {
        let id = match record.get("idMeal")? {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = text(record, "strMeal")?;

        Some(Self {
            id,
            name,
            category: text(record, "strCategory"),
            area: text(record, "strArea"),
            instructions: text(record, "strInstructions"),
            thumbnail: text(record, "strMealThumb"),
            tags: text(record, "strTags"),
            youtube: text(record, "strYoutube"),
            ingredients: numbered(record, "strIngredient"),
            measures: numbered(record, "strMeasure"),
            source: text(record, "strSource"),
        })
    }
}

impl From<Dish> for DishSummary {
    fn from(d: Dish) -> Self {
        Self {
            id: d.id,
            name: d.name,
            category: d.category,
            area: d.area,
        }
    }
}

fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

// Each list drops its own blanks, so the two may differ in length.
fn numbered(record: &Map<String, Value>, prefix: &str) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|i| text(record, &format!("{prefix}{i}")))
        .map(|s| s.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn maps_catalog_record() {
        let rec = record(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350F.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "strTags": "Meat,Casserole",
            "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
            "strIngredient1": "soy sauce",
            "strIngredient2": "water",
            "strIngredient3": "",
            "strIngredient4": null,
            "strMeasure1": "3/4 cup",
            "strMeasure2": "1/2 cup",
            "strMeasure3": " ",
            "strSource": null
        }));

        let dish = Dish::from_api(&rec).expect("valid record");
        assert_eq!(dish.id, "52772");
        assert_eq!(dish.name, "Teriyaki Chicken Casserole");
        assert_eq!(dish.category.as_deref(), Some("Chicken"));
        assert_eq!(dish.area.as_deref(), Some("Japanese"));
        assert_eq!(dish.tags.as_deref(), Some("Meat,Casserole"));
        assert_eq!(dish.ingredients, vec!["soy sauce", "water"]);
        assert_eq!(dish.measures, vec!["3/4 cup", "1/2 cup"]);
        assert_eq!(dish.source, None);
    }

    #[test]
    fn empties_are_dropped_independently() {
        let rec = record(json!({
            "idMeal": "1",
            "strMeal": "Toast",
            "strIngredient1": "bread",
            "strIngredient2": "butter",
            "strMeasure1": "",
            "strMeasure2": "1 knob",
            "strIngredient20": "salt",
            "strIngredient21": "ignored"
        }));
        let dish = Dish::from_api(&rec).unwrap();
        assert_eq!(dish.ingredients, vec!["bread", "butter", "salt"]);
        assert_eq!(dish.measures, vec!["1 knob"]);
    }

    #[test]
    fn records_without_id_or_name_are_rejected() {
        assert!(Dish::from_api(&record(json!({ "strMeal": "Nameless" }))).is_none());
        assert!(Dish::from_api(&record(json!({ "idMeal": "9" }))).is_none());
        assert!(Dish::from_api(&record(json!({ "idMeal": "", "strMeal": "x" }))).is_none());
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let dish = Dish::from_api(&record(json!({ "idMeal": 52772, "strMeal": "x" }))).unwrap();
        assert_eq!(dish.id, "52772");
    }

    #[test]
    fn null_or_odd_meals_mean_no_records() {
        let none: CatalogResponse = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(none.into_records().is_empty());

        let odd: CatalogResponse = serde_json::from_str(r#"{"meals": "Invalid ID"}"#).unwrap();
        assert!(odd.into_records().is_empty());

        let missing: CatalogResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.into_records().is_empty());
    }

    #[test]
    fn summary_keeps_list_fields() {
        let dish = Dish::from_api(&record(json!({
            "idMeal": "7",
            "strMeal": "Shakshuka",
            "strCategory": "Vegetarian",
            "strArea": "Egyptian",
            "strInstructions": "long text"
        })))
        .unwrap();
        let summary = DishSummary::from(dish);
        assert_eq!(
            summary,
            DishSummary {
                id: "7".into(),
                name: "Shakshuka".into(),
                category: Some("Vegetarian".into()),
                area: Some("Egyptian".into()),
            }
        );
    }
}
