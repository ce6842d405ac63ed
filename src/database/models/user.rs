use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;

/// Owner of results. Managed outside this service; read here to validate
/// ownership on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Insert payload for a user; `password` is stored hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: &str, roles: Vec<String>) -> Self {
        Self {
            email: email.into(),
            password: hash_password(password),
            roles,
        }
    }
}

/// Hex-encoded SHA-256 digest of a plain-text password
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_never_keeps_plain_password() {
        let user = NewUser::new("a@example.com", "secret", vec!["ROLE_USER".into()]);
        assert_ne!(user.password, "secret");
        assert_eq!(user.password.len(), 64);
        assert_eq!(user.password, hash_password("secret"));
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User {
            id: 1,
            email: "a@example.com".into(),
            password: hash_password("secret"),
            roles: vec!["ROLE_USER".into()],
        };
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("password").is_none());
        assert!(user.has_role("ROLE_USER"));
        assert!(!user.has_role("ROLE_ADMIN"));
    }
}
