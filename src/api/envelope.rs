use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ResultRecord, User};

/// `{ code, message }` body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub code: u16,
    pub message: String,
}

impl Message {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub parent: Link,
    #[serde(rename = "self")]
    pub self_link: Link,
}

/// Public view of a result's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// Wire format of a result: `{ id, result, user, time, _links }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    pub id: i32,
    pub result: i32,
    pub user: UserView,
    pub time: DateTime<Utc>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl ResultView {
    /// Build the view, computing `parent`/`self` links under `base_path`
    pub fn from_record(record: &ResultRecord, base_path: &str) -> Self {
        Self {
            id: record.id,
            result: record.result,
            user: UserView::from(&record.user),
            time: record.time,
            links: Links {
                parent: Link {
                    href: base_path.to_string(),
                },
                self_link: Link {
                    href: resource_uri(base_path, record.id),
                },
            },
        }
    }
}

/// Canonical URI of a single result
pub fn resource_uri(base_path: &str, id: i32) -> String {
    format!("{}/{}", base_path, id)
}

/// `{ "result": ... }`, also the element type of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub result: ResultView,
}

/// `{ "results": [ { "result": ... }, ... ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCollection {
    pub results: Vec<ResultItem>,
}

/// Every body this resource can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Result(ResultItem),
    Results(ResultCollection),
    Message(Message),
}

impl Envelope {
    pub fn result(view: ResultView) -> Self {
        Envelope::Result(ResultItem { result: view })
    }

    pub fn results(views: Vec<ResultView>) -> Self {
        Envelope::Results(ResultCollection {
            results: views.into_iter().map(|result| ResultItem { result }).collect(),
        })
    }
}
