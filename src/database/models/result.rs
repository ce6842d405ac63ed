use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// A persisted score owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: i32,
    pub result: i32,
    pub user: User,
    pub time: DateTime<Utc>,
}

/// A result that has not been stored yet, so it has no id.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub result: i32,
    pub user: User,
    pub time: DateTime<Utc>,
}

impl NewResult {
    pub fn new(result: i32, user: User, time: DateTime<Utc>) -> Self {
        Self { result, user, time }
    }

    pub fn into_record(self, id: i32) -> ResultRecord {
        ResultRecord {
            id,
            result: self.result,
            user: self.user,
            time: self.time,
        }
    }
}
