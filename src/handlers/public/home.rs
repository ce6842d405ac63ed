use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - Service descriptor
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let base = state.resource.base_path();

    Json(json!({
        "name": "Results API",
        "version": version,
        "description": "Scored results with JWT-gated CRUD and JSON/XML negotiation",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "list": format!("GET {}[.json|.xml][/{{id|result|user}}] (authenticated)", base),
            "item": format!("GET|PUT|DELETE {}/{{id}}[.json|.xml] (authenticated)", base),
            "create": format!("POST {}[.json|.xml] (authenticated)", base),
            "options": format!("OPTIONS {}[/{{id}}] (public)", base),
        }
    }))
}

/// GET /health - Store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.resource.store().health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                })),
            )
        }
    }
}
