pub mod companies;
pub mod orders;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{access, error::AppError, AppState};

pub fn router(state: AppState) -> Router {
    // Every page route goes through the access gate
    let pages = Router::new()
        // Orders
        .route("/orders", get(orders::list))
        .route("/orders/create", get(orders::create_form).post(orders::create))
        .route("/orders/view/:id", get(orders::view))
        // Companies
        .route("/companies", get(companies::list))
        .route("/companies/view/:id", get(companies::view))
        .route_layer(middleware::from_fn_with_state(state.clone(), access::enforce));

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".into())
}
