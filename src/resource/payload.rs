use serde_json::{Map, Value};

pub const RESULT_ATTR: &str = "result";
pub const USER_ATTR: &str = "user";

/// State of one integer field in a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Absent or `null`
    Missing,
    Integer(i32),
    /// Present but not an `i32`
    Invalid,
}

impl Field {
    pub fn value(self) -> Option<i32> {
        match self {
            Field::Integer(v) => Some(v),
            Field::Missing | Field::Invalid => None,
        }
    }
}

/// Decoded body of a create/update request.
///
/// Bodies that are not a JSON object decode to an empty payload, so the
/// caller still goes through authorization before anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPayload {
    fields: Map<String, Value>,
}

impl ResultPayload {
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                if !body.is_empty() {
                    tracing::debug!("Ignoring undecodable request body: {}", e);
                }
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn field(&self, name: &str) -> Field {
        match self.fields.get(name) {
            None | Some(Value::Null) => Field::Missing,
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Field::Integer)
                .unwrap_or(Field::Invalid),
            Some(_) => Field::Invalid,
        }
    }

    pub fn result(&self) -> Field {
        self.field(RESULT_ATTR)
    }

    /// Owner id named by the payload; only a JSON integer counts
    pub fn user(&self) -> Option<i32> {
        self.field(USER_ATTR).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_integer_fields() {
        let payload = ResultPayload::from_value(json!({ "result": 214, "user": 1 }));
        assert_eq!(payload.result(), Field::Integer(214));
        assert_eq!(payload.user(), Some(1));
    }

    #[test]
    fn null_counts_as_missing() {
        let payload = ResultPayload::from_value(json!({ "result": null }));
        assert_eq!(payload.result(), Field::Missing);
        assert_eq!(payload.user(), None);
    }

    #[test]
    fn non_integers_are_invalid() {
        let payload = ResultPayload::from_value(json!({
            "result": "214",
            "user": 1.5,
        }));
        assert_eq!(payload.result(), Field::Invalid);
        assert_eq!(payload.user(), None);

        let huge = ResultPayload::from_value(json!({ "result": 1_i64 << 40 }));
        assert_eq!(huge.result(), Field::Invalid);
    }

    #[test]
    fn garbage_bodies_are_empty() {
        assert_eq!(ResultPayload::from_bytes(b"not json"), ResultPayload::default());
        assert_eq!(ResultPayload::from_bytes(b"[1, 2]"), ResultPayload::default());
        assert_eq!(ResultPayload::from_bytes(b""), ResultPayload::default());
    }
}
