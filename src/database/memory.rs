use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewResult, NewUser, ResultRecord, User};
use crate::database::repository::ResultStore;
use crate::types::SortKey;

/// Result row as kept in memory; the owner is joined on read.
#[derive(Debug, Clone)]
struct StoredResult {
    id: i32,
    result: i32,
    user_id: i32,
    time: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i32, User>,
    results: BTreeMap<i32, StoredResult>,
    next_user_id: i32,
    next_result_id: i32,
}

impl MemoryState {
    fn join(&self, stored: &StoredResult) -> Result<ResultRecord, DatabaseError> {
        let user = self.users.get(&stored.user_id).cloned().ok_or_else(|| {
            DatabaseError::QueryError(format!(
                "result {} references missing user {}",
                stored.id, stored.user_id
            ))
        })?;
        Ok(ResultRecord {
            id: stored.id,
            result: stored.result,
            user,
            time: stored.time,
        })
    }
}

/// `ResultStore` kept in process memory. Used by the `memory` backend and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn find_result(&self, id: i32) -> Result<Option<ResultRecord>, DatabaseError> {
        let state = self.state.read().await;
        state.results.get(&id).map(|r| state.join(r)).transpose()
    }

    async fn find_results(&self, sort: SortKey) -> Result<Vec<ResultRecord>, DatabaseError> {
        let state = self.state.read().await;
        // BTreeMap iteration is already id-ascending, and the sort is stable
        let mut rows: Vec<&StoredResult> = state.results.values().collect();
        match sort {
            SortKey::Id => {}
            SortKey::Result => rows.sort_by_key(|r| r.result),
            SortKey::User => rows.sort_by_key(|r| r.user_id),
        }
        rows.into_iter().map(|r| state.join(r)).collect()
    }

    async fn find_result_by_score(&self, score: i32) -> Result<Option<ResultRecord>, DatabaseError> {
        let state = self.state.read().await;
        state
            .results
            .values()
            .find(|r| r.result == score)
            .map(|r| state.join(r))
            .transpose()
    }

    async fn insert_result(&self, new: NewResult) -> Result<ResultRecord, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&new.user.id) {
            return Err(DatabaseError::QueryError(format!(
                "foreign key violation: user {} does not exist",
                new.user.id
            )));
        }
        state.next_result_id += 1;
        let id = state.next_result_id;
        state.results.insert(
            id,
            StoredResult {
                id,
                result: new.result,
                user_id: new.user.id,
                time: new.time,
            },
        );
        let stored = state.results[&id].clone();
        state.join(&stored)
    }

    async fn save_result(&self, record: &ResultRecord) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state
            .results
            .get_mut(&record.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("result {}", record.id)))?;
        stored.result = record.result;
        stored.time = record.time;
        Ok(())
    }

    async fn remove_result(&self, id: i32) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state
            .results
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("result {}", id)))
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == new.email) {
            return Err(DatabaseError::QueryError(format!(
                "unique violation: email '{}' already registered",
                new.email
            )));
        }
        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            email: new.email,
            password: new.password,
            roles: new.roles,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn remove_user(&self, id: i32) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        state.results.retain(|_, r| r.user_id != id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryStore, User, User) {
        let store = MemoryStore::new();
        let alice = store
            .insert_user(NewUser::new("alice@example.com", "pw", vec!["ROLE_USER".into()]))
            .await
            .unwrap();
        let bob = store
            .insert_user(NewUser::new("bob@example.com", "pw", vec!["ROLE_USER".into()]))
            .await
            .unwrap();
        (store, alice, bob)
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let (store, alice, _) = seeded().await;
        let first = store.insert_result(NewResult::new(10, alice.clone(), Utc::now())).await.unwrap();
        let second = store.insert_result(NewResult::new(5, alice, Utc::now())).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.find_result(first.id).await.unwrap().unwrap().result, 10);
    }

    #[tokio::test]
    async fn sorts_by_requested_key() {
        let (store, alice, bob) = seeded().await;
        store.insert_result(NewResult::new(30, bob.clone(), Utc::now())).await.unwrap();
        store.insert_result(NewResult::new(10, alice.clone(), Utc::now())).await.unwrap();
        store.insert_result(NewResult::new(20, bob, Utc::now())).await.unwrap();

        let by_result: Vec<i32> = store
            .find_results(SortKey::Result)
            .await
            .unwrap()
            .iter()
            .map(|r| r.result)
            .collect();
        assert_eq!(by_result, vec![10, 20, 30]);

        let by_user: Vec<i32> = store
            .find_results(SortKey::User)
            .await
            .unwrap()
            .iter()
            .map(|r| r.user.id)
            .collect();
        assert_eq!(by_user, vec![alice.id, 2, 2]);

        let by_id: Vec<i32> = store
            .find_results(SortKey::Id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(by_id, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn rejects_dangling_owner() {
        let (store, _, _) = seeded().await;
        let ghost = User {
            id: 99,
            email: "ghost@example.com".into(),
            password: String::new(),
            roles: vec![],
        };
        assert!(store.insert_result(NewResult::new(1, ghost, Utc::now())).await.is_err());
    }

    #[tokio::test]
    async fn removing_user_cascades_to_results() {
        let (store, alice, bob) = seeded().await;
        let kept = store.insert_result(NewResult::new(1, bob, Utc::now())).await.unwrap();
        let gone = store.insert_result(NewResult::new(2, alice.clone(), Utc::now())).await.unwrap();

        store.remove_user(alice.id).await.unwrap();

        assert!(store.find_result(gone.id).await.unwrap().is_none());
        assert!(store.find_result(kept.id).await.unwrap().is_some());
        assert!(store.find_user(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutations_on_missing_rows_report_not_found() {
        let (store, alice, _) = seeded().await;
        let record = store.insert_result(NewResult::new(1, alice, Utc::now())).await.unwrap();
        store.remove_result(record.id).await.unwrap();

        assert!(matches!(store.remove_result(record.id).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.save_result(&record).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn finds_by_score() {
        let (store, alice, _) = seeded().await;
        store.insert_result(NewResult::new(7, alice, Utc::now())).await.unwrap();
        assert!(store.find_result_by_score(7).await.unwrap().is_some());
        assert!(store.find_result_by_score(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn emails_are_unique() {
        let (store, _, _) = seeded().await;
        let dup = NewUser::new("alice@example.com", "pw", vec![]);
        assert!(store.insert_user(dup).await.is_err());
    }
}
