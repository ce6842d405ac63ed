use axum::http::{header, HeaderName, StatusCode};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

use crate::api::envelope::{resource_uri, Envelope, ResultView};
use crate::api::format::etag;
use crate::auth::Principal;
use crate::database::models::NewResult;
use crate::database::repository::ResultStore;
use crate::error::ApiError;
use crate::policy::{can_act, Action};
use crate::types::SortKey;

use super::payload::{Field, ResultPayload};

/// Non-standard "Content Returned" status sent by a successful update
pub const CONTENT_RETURNED: u16 = 209;

pub const ALLOW_ITEM: &str = "GET, PUT, DELETE, OPTIONS";
pub const ALLOW_COLLECTION: &str = "GET, POST, OPTIONS";

const CACHE_REVALIDATE: &str = "must-revalidate";
const CACHE_IMMUTABLE: &str = "public, immutable";

/// Successful outcome of an operation, before format negotiation
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, String)>,
    pub body: Option<Envelope>,
}

impl Reply {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Envelope) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn content_returned() -> StatusCode {
    StatusCode::from_u16(CONTENT_RETURNED).unwrap_or(StatusCode::OK)
}

/// Request-handling rules for the results collection and its items.
///
/// Every guarded operation receives the resolved principal explicitly; `None`
/// means the request carried no valid credentials and fails with 401 before
/// anything else is looked at.
pub struct ResultResource {
    store: Arc<dyn ResultStore>,
    base_path: String,
}

impl ResultResource {
    pub fn new(store: Arc<dyn ResultStore>, base_path: impl Into<String>) -> Self {
        Self {
            store,
            base_path: base_path.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// GET collection
    pub async fn list(&self, principal: Option<&Principal>, sort: SortKey) -> Result<Reply, ApiError> {
        authorize(principal, Action::List, None)?;
        tracing::debug!("Listing results ordered by {}", sort.as_str());

        let records = self.store.find_results(sort).await?;
        if records.is_empty() {
            return Err(ApiError::not_found());
        }

        let views: Vec<ResultView> = records
            .iter()
            .map(|r| ResultView::from_record(r, &self.base_path))
            .collect();
        let tag = etag(&views)?;

        Ok(Reply::new(StatusCode::OK)
            .with_header(header::CACHE_CONTROL, CACHE_REVALIDATE)
            .with_header(header::ETAG, tag)
            .with_body(Envelope::results(views)))
    }

    /// GET item
    pub async fn get_one(&self, principal: Option<&Principal>, id: i32) -> Result<Reply, ApiError> {
        authorize(principal, Action::Read, None)?;

        let record = self.store.find_result(id).await?.ok_or_else(ApiError::not_found)?;
        let view = ResultView::from_record(&record, &self.base_path);
        let tag = etag(&view)?;

        Ok(Reply::new(StatusCode::OK)
            .with_header(header::CACHE_CONTROL, CACHE_REVALIDATE)
            .with_header(header::ETAG, tag)
            .with_body(Envelope::result(view)))
    }

    /// OPTIONS, public. `None` or `Some(0)` describes the collection.
    pub fn options(&self, id: Option<i32>) -> Reply {
        let allow = match id {
            Some(id) if id != 0 => ALLOW_ITEM,
            _ => ALLOW_COLLECTION,
        };

        Reply::new(StatusCode::NO_CONTENT)
            .with_header(header::ALLOW, allow)
            .with_header(header::CACHE_CONTROL, CACHE_IMMUTABLE)
    }

    /// DELETE item, administrators only
    pub async fn delete(&self, principal: Option<&Principal>, id: i32) -> Result<Reply, ApiError> {
        let principal = authorize(principal, Action::Delete, None)?;

        if self.store.find_result(id).await?.is_none() {
            return Err(ApiError::not_found());
        }
        self.store.remove_result(id).await?;

        tracing::info!("Result {} deleted by user {}", id, principal.id);
        Ok(Reply::new(StatusCode::NO_CONTENT))
    }

    /// POST collection
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        payload: &ResultPayload,
    ) -> Result<Reply, ApiError> {
        let principal = authorize(principal, Action::Create, payload.user())?;

        let (Some(score), Some(user_id)) = (payload.result().value(), payload.user()) else {
            return Err(ApiError::unprocessable_entity());
        };

        let Some(owner) = self.store.find_user(user_id).await? else {
            tracing::debug!("Create rejected: user {} does not exist", user_id);
            return Err(ApiError::bad_request());
        };

        let now = Utc::now().trunc_subsecs(6);
        let record = self
            .store
            .insert_result(NewResult::new(score, owner, now))
            .await?;

        tracing::info!(
            "Result {} (score {}) created for user {} by user {}",
            record.id,
            record.result,
            record.user.id,
            principal.id
        );

        Ok(Reply::new(StatusCode::CREATED)
            .with_header(header::LOCATION, resource_uri(&self.base_path, record.id))
            .with_body(Envelope::result(ResultView::from_record(&record, &self.base_path))))
    }

    /// PUT item. The score must not already be held by any stored result,
    /// the target included.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: i32,
        payload: &ResultPayload,
    ) -> Result<Reply, ApiError> {
        let principal = authorize(principal, Action::Update, payload.user())?;

        let mut record = self.store.find_result(id).await?.ok_or_else(ApiError::not_found)?;

        match payload.result() {
            Field::Missing => {}
            Field::Invalid => return Err(ApiError::bad_request()),
            Field::Integer(score) => {
                if let Some(holder) = self.store.find_result_by_score(score).await? {
                    tracing::debug!(
                        "Update of result {} rejected: score {} already held by result {}",
                        id,
                        score,
                        holder.id
                    );
                    return Err(ApiError::bad_request());
                }
                record.result = score;
            }
        }

        self.store.save_result(&record).await?;

        tracing::info!("Result {} updated by user {}", record.id, principal.id);
        Ok(Reply::new(content_returned())
            .with_body(Envelope::result(ResultView::from_record(&record, &self.base_path))))
    }
}

/// 401 without a principal, 403 when the policy says no
fn authorize(
    principal: Option<&Principal>,
    action: Action,
    target_user: Option<i32>,
) -> Result<&Principal, ApiError> {
    let principal = principal.ok_or_else(ApiError::unauthorized)?;
    if !can_act(principal, action, target_user) {
        tracing::debug!(
            "User {} denied {:?} on behalf of {:?}",
            principal.id,
            action,
            target_user
        );
        return Err(ApiError::forbidden());
    }
    Ok(principal)
}
