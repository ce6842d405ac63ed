use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

/// Permissive CORS that only answers real preflights.
///
/// `Cors` treats every OPTIONS request as a preflight, so a plain OPTIONS
/// (no `Origin` plus `Access-Control-Request-Method`) is sent straight to
/// `inner` and reaches the resource's own OPTIONS handlers.
pub fn with_permissive_cors(inner: Router) -> Router {
    inner
        .clone()
        .layer(CorsLayer::permissive())
        .layer(from_fn_with_state(inner, bypass_plain_options))
}

async fn bypass_plain_options(
    State(inner): State<Router>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::OPTIONS || is_preflight(request.headers()) {
        return next.run(request).await;
    }

    match inner.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

pub fn is_preflight(headers: &HeaderMap) -> bool {
    headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn preflight_needs_origin_and_requested_method() {
        let mut headers = HeaderMap::new();
        assert!(!is_preflight(&headers));

        headers.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"));
        assert!(!is_preflight(&headers));

        headers.insert(header::ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("PUT"));
        assert!(is_preflight(&headers));
    }
}
