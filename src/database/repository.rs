use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewResult, NewUser, ResultRecord, User};
use crate::types::SortKey;

/// Persistence seam for results and the users they reference.
///
/// Every mutating call is its own unit of work: it either commits or leaves
/// the store untouched. Lookups return `Ok(None)` for missing rows; mutations
/// on a missing row return `DatabaseError::NotFound`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn find_result(&self, id: i32) -> Result<Option<ResultRecord>, DatabaseError>;

    /// All results, ascending by `sort` with ties broken by id
    async fn find_results(&self, sort: SortKey) -> Result<Vec<ResultRecord>, DatabaseError>;

    /// First result carrying exactly this score, if any
    async fn find_result_by_score(&self, score: i32) -> Result<Option<ResultRecord>, DatabaseError>;

    async fn insert_result(&self, new: NewResult) -> Result<ResultRecord, DatabaseError>;

    /// Persist the mutable fields (`result`, `time`) of an existing record
    async fn save_result(&self, record: &ResultRecord) -> Result<(), DatabaseError>;

    async fn remove_result(&self, id: i32) -> Result<(), DatabaseError>;

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError>;

    /// Removes the user and, by cascade, every result it owns
    async fn remove_user(&self, id: i32) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
