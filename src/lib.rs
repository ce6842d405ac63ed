use axum::{
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod resource;
pub mod types;

use crate::api::format::Format;
use crate::database::ResultStore;
use crate::error::ApiError;
use crate::handlers::protected::results::utils::collection_parent;
use crate::resource::ResultResource;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resource: Arc<ResultResource>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResultStore>, base_path: impl Into<String>) -> Self {
        Self {
            resource: Arc::new(ResultResource::new(store, base_path)),
        }
    }
}

/// Build the HTTP application.
///
/// The collection is routed as `{parent}/:collection` so the `.json`/`.xml`
/// suffix on the collection segment can be parsed by the handler.
pub fn app(state: AppState) -> Router {
    use handlers::{protected::results, public};

    let cfg = config::config();
    let parent = collection_parent(state.resource.base_path()).to_string();
    let collection_route = format!("{}/:collection", parent);
    let item_route = format!("{}/:collection/:segment", parent);

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Results resource
        .route(
            &collection_route,
            get(results::collection_get)
                .post(results::collection_post)
                .options(results::collection_options)
                .fallback(results::collection_fallback),
        )
        .route(
            &item_route,
            get(results::record_get)
                .put(results::record_put)
                .delete(results::record_delete)
                .options(results::record_options)
                .fallback(results::record_fallback),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::authenticate))
        .with_state(state);

    if cfg.security.enable_cors {
        router = middleware::with_permissive_cors(router);
    }
    if cfg.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

async fn not_found(headers: HeaderMap) -> Response {
    middleware::error_response(Format::negotiate(None, &headers), &ApiError::not_found())
}
