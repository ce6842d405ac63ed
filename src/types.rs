/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering accepted by the collection endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Result,
    User,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Result => "result",
            SortKey::User => "user",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "result" => Ok(SortKey::Result),
            "user" => Ok(SortKey::User),
            other => Err(format!("unsupported sort key '{}'", other)),
        }
    }
}
