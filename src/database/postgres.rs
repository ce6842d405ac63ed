use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewResult, NewUser, ResultRecord, User};
use crate::database::repository::ResultStore;
use crate::types::SortKey;

const SELECT_RESULTS: &str = r#"
    SELECT r.id, r.result, r.time,
           u.id AS user_id, u.email, u.password, u.roles
    FROM results r
    JOIN users u ON u.id = r.user_id
"#;

/// Flat row of a result joined with its owner
#[derive(Debug, FromRow)]
struct ResultRow {
    id: i32,
    result: i32,
    time: DateTime<Utc>,
    user_id: i32,
    email: String,
    password: String,
    roles: Vec<String>,
}

impl From<ResultRow> for ResultRecord {
    fn from(row: ResultRow) -> Self {
        ResultRecord {
            id: row.id,
            result: row.result,
            time: row.time,
            user: User {
                id: row.user_id,
                email: row.email,
                password: row.password,
                roles: row.roles,
            },
        }
    }
}

fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Id => "ORDER BY r.id ASC",
        SortKey::Result => "ORDER BY r.result ASC, r.id ASC",
        SortKey::User => "ORDER BY r.user_id ASC, r.id ASC",
    }
}

/// `ResultStore` over a Postgres pool
#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn find_result(&self, id: i32) -> Result<Option<ResultRecord>, DatabaseError> {
        let sql = format!("{} WHERE r.id = $1", SELECT_RESULTS);
        let row = sqlx::query_as::<_, ResultRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ResultRecord::from))
    }

    async fn find_results(&self, sort: SortKey) -> Result<Vec<ResultRecord>, DatabaseError> {
        let sql = format!("{} {}", SELECT_RESULTS, order_clause(sort));
        let rows = sqlx::query_as::<_, ResultRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ResultRecord::from).collect())
    }

    async fn find_result_by_score(&self, score: i32) -> Result<Option<ResultRecord>, DatabaseError> {
        let sql = format!("{} WHERE r.result = $1 ORDER BY r.id ASC LIMIT 1", SELECT_RESULTS);
        let row = sqlx::query_as::<_, ResultRow>(&sql)
            .bind(score)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ResultRecord::from))
    }

    async fn insert_result(&self, new: NewResult) -> Result<ResultRecord, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO results (result, user_id, time) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new.result)
        .bind(new.user.id)
        .bind(new.time)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(new.into_record(id))
    }

    async fn save_result(&self, record: &ResultRecord) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let done = sqlx::query("UPDATE results SET result = $1, time = $2 WHERE id = $3")
            .bind(record.result)
            .bind(record.time)
            .bind(record.id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("result {}", record.id)));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_result(&self, id: i32) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let done = sqlx::query("DELETE FROM results WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("result {}", id)));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, roles FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password, roles) VALUES ($1, $2, $3)
             RETURNING id, email, password, roles",
        )
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.roles)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn remove_user(&self, id: i32) -> Result<(), DatabaseError> {
        // results.user_id is declared ON DELETE CASCADE
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
