use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Uri},
    response::Response,
    Extension,
};

use crate::api::format::Format;
use crate::middleware::{error_response, respond, Authentication};
use crate::resource::results::ALLOW_COLLECTION;
use crate::resource::ResultPayload;
use crate::AppState;

use super::utils::{method_not_allowed, parse_collection, parse_sort, ListQuery};

/// GET /results[.fmt]?sort= - List every result
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    Path(collection): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let suffix = match parse_collection(state.resource.base_path(), &collection) {
        Ok(suffix) => suffix,
        Err(e) => return error_response(Format::negotiate(None, &headers), &e),
    };
    let format = Format::negotiate(suffix, &headers);

    let sort = match parse_sort(query.sort.as_deref()) {
        Ok(sort) => sort,
        Err(e) => return error_response(format, &e),
    };

    respond(format, state.resource.list(auth.principal(), sort).await)
}

/// POST /results[.fmt] - Create a result
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<Authentication>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let suffix = match parse_collection(state.resource.base_path(), &collection) {
        Ok(suffix) => suffix,
        Err(e) => return error_response(Format::negotiate(None, &headers), &e),
    };
    let format = Format::negotiate(suffix, &headers);
    let payload = ResultPayload::from_bytes(&body);

    respond(format, state.resource.create(auth.principal(), &payload).await)
}

/// OPTIONS /results[.fmt] - Allowed methods on the collection
pub async fn options(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    match parse_collection(state.resource.base_path(), &collection) {
        Ok(suffix) => respond(Format::negotiate(suffix, &headers), Ok(state.resource.options(None))),
        Err(e) => error_response(Format::negotiate(None, &headers), &e),
    }
}

/// Any other method on the collection
pub async fn fallback(uri: Uri, headers: HeaderMap) -> Response {
    method_not_allowed(&uri, &headers, ALLOW_COLLECTION)
}
