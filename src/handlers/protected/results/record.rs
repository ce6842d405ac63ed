use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Uri},
    response::Response,
    Extension,
};

use crate::api::format::Format;
use crate::error::ApiError;
use crate::middleware::{error_response, respond, Authentication};
use crate::resource::results::ALLOW_ITEM;
use crate::resource::ResultPayload;
use crate::types::SortKey;
use crate::AppState;

use super::utils::{method_not_allowed, parse_collection, parse_item, parse_sort};

/// What a `/results[.fmt]/{segment}` path names
enum Target {
    Item(i32, Format),
    Listing(SortKey, Format),
}

/// Resolve the two path segments. A bare collection followed by a sort key
/// is a sorted listing; `.fmt` on the collection only admits a sort key.
fn resolve(
    state: &AppState,
    collection: &str,
    segment: &str,
    headers: &HeaderMap,
) -> Result<Target, ApiError> {
    let collection_suffix = parse_collection(state.resource.base_path(), collection)?;

    if collection_suffix.is_none() {
        if let Ok((id, suffix)) = parse_item(segment) {
            return Ok(Target::Item(id, Format::negotiate(suffix, headers)));
        }
    }

    let sort = parse_sort(Some(segment))?;
    Ok(Target::Listing(sort, Format::negotiate(collection_suffix, headers)))
}

/// Item-only routes: PUT, DELETE, OPTIONS
fn resolve_item(
    state: &AppState,
    collection: &str,
    segment: &str,
    headers: &HeaderMap,
) -> Result<(i32, Format), ApiError> {
    if parse_collection(state.resource.base_path(), collection)?.is_some() {
        return Err(ApiError::not_found());
    }
    let (id, suffix) = parse_item(segment)?;
    Ok((id, Format::negotiate(suffix, headers)))
}

/// GET /results/{id}[.fmt] - Get one result
/// GET /results[.fmt]/{sort} - Sorted listing
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    Path((collection, segment)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    match resolve(&state, &collection, &segment, &headers) {
        Ok(Target::Item(id, format)) => {
            respond(format, state.resource.get_one(auth.principal(), id).await)
        }
        Ok(Target::Listing(sort, format)) => {
            respond(format, state.resource.list(auth.principal(), sort).await)
        }
        Err(e) => error_response(Format::negotiate(None, &headers), &e),
    }
}

/// PUT /results/{id}[.fmt] - Update a result's score
pub async fn put(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    Path((collection, segment)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (id, format) = match resolve_item(&state, &collection, &segment, &headers) {
        Ok(target) => target,
        Err(e) => return error_response(Format::negotiate(None, &headers), &e),
    };
    let payload = ResultPayload::from_bytes(&body);

    respond(format, state.resource.update(auth.principal(), id, &payload).await)
}

/// DELETE /results/{id}[.fmt] - Remove a result (administrators)
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    Path((collection, segment)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let (id, format) = match resolve_item(&state, &collection, &segment, &headers) {
        Ok(target) => target,
        Err(e) => return error_response(Format::negotiate(None, &headers), &e),
    };

    respond(format, state.resource.delete(auth.principal(), id).await)
}

/// OPTIONS /results/{id}[.fmt] - Allowed methods on an item
pub async fn options(
    State(state): State<AppState>,
    Path((collection, segment)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    match resolve_item(&state, &collection, &segment, &headers) {
        Ok((id, format)) => respond(format, Ok(state.resource.options(Some(id)))),
        Err(e) => error_response(Format::negotiate(None, &headers), &e),
    }
}

/// Any other method on an item
pub async fn fallback(uri: Uri, headers: HeaderMap) -> Response {
    method_not_allowed(&uri, &headers, ALLOW_ITEM)
}
