//! Canned catalog responses served from a local port.

use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

/// Serves a tiny fake catalog on a random local port.
pub async fn spawn_catalog() -> String {
    async fn search(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        match q.get("s").map(String::as_str) {
            Some("arrabiata") => Json(json!({ "meals": [
                { "idMeal": "52771", "strMeal": "Spicy Arrabiata Penne",
                  "strCategory": "Vegetarian", "strArea": "Italian",
                  "strIngredient1": "penne rigate", "strMeasure1": "1 pound" },
                { "strMeal": "Broken record" }
            ]})),
            Some("mac & cheese") => Json(json!({ "meals": [
                { "idMeal": "1", "strMeal": "Mac & Cheese" }
            ]})),
            _ => Json(json!({ "meals": null })),
        }
    }

    async fn lookup(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        match q.get("i").map(String::as_str) {
            Some("52771") => Json(json!({ "meals": [
                { "idMeal": "52771", "strMeal": "Spicy Arrabiata Penne",
                  "strIngredient1": "penne rigate", "strIngredient2": "olive oil",
                  "strMeasure1": "1 pound", "strMeasure2": "1/4 cup" }
            ]})),
            _ => Json(json!({ "meals": null })),
        }
    }

    let app = Router::new()
        .route("/search.php", get(search))
        .route("/lookup.php", get(lookup))
        .route(
            "/broken/search.php",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .route("/garbage/search.php", get(|| async { "<html>oops</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind catalog");
    let addr = listener.local_addr().expect("catalog addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}/", addr)
}
