use axum::http::{header, HeaderMap, HeaderValue, Uri};
use axum::response::Response;
use serde::Deserialize;

use crate::api::format::{split_suffix, Format};
use crate::error::ApiError;
use crate::middleware::error_response;
use crate::types::SortKey;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Sort key (`id`, `result`, `user`); the path form takes precedence
    pub sort: Option<String>,
}

/// Last path segment of the base path, e.g. `results` for `/api/v1/results`
pub fn collection_name(base_path: &str) -> &str {
    base_path.rsplit('/').next().unwrap_or(base_path)
}

/// Everything above the collection, e.g. `/api/v1` for `/api/v1/results`
pub fn collection_parent(base_path: &str) -> &str {
    base_path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Match `results`, `results.json` or `results.xml` against the collection.
/// Anything else is treated as an unknown route.
pub fn parse_collection(base_path: &str, segment: &str) -> Result<Option<Format>, ApiError> {
    let (stem, suffix) = split_suffix(segment);
    if stem != collection_name(base_path) {
        return Err(ApiError::not_found());
    }
    parse_suffix(suffix)
}

/// Match `{id}` or `{id}.{fmt}`; ids are unsigned digits only
pub fn parse_item(segment: &str) -> Result<(i32, Option<Format>), ApiError> {
    let (stem, suffix) = split_suffix(segment);
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::not_found());
    }
    let id = stem.parse::<i32>().map_err(|_| ApiError::not_found())?;
    Ok((id, parse_suffix(suffix)?))
}

/// 405 envelope for a method the route does not serve, with `Allow`
pub fn method_not_allowed(uri: &Uri, headers: &HeaderMap, allow: &'static str) -> Response {
    let suffix = uri
        .path()
        .rsplit('/')
        .next()
        .and_then(|segment| split_suffix(segment).1)
        .and_then(Format::from_suffix);

    let mut response = error_response(Format::negotiate(suffix, headers), &ApiError::method_not_allowed());
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

pub fn parse_sort(value: Option<&str>) -> Result<SortKey, ApiError> {
    match value {
        None => Ok(SortKey::default()),
        Some(key) => key.parse::<SortKey>().map_err(|_| ApiError::not_found()),
    }
}

fn parse_suffix(suffix: Option<&str>) -> Result<Option<Format>, ApiError> {
    match suffix {
        None => Ok(None),
        Some(s) => Format::from_suffix(s).map(Some).ok_or_else(ApiError::not_found),
    }
}
