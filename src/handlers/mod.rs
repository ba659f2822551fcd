pub mod products;


use axum::{response::Html, Json};
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": 200, "message": "OK" }))
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
