use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::database::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id of the principal
    pub sub: i32,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: i32, email: String, roles: Vec<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            roles,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone(), user.roles.clone())
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub email: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Holds the configured administrative role
    pub fn is_admin(&self) -> bool {
        self.has_role(&config::config().security.admin_role)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    InvalidScheme,

    #[error("Empty JWT token")]
    EmptyToken,

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}

/// Validate JWT token and extract claims
pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_principal() {
        let claims = Claims::new(5, "p@example.com".into(), vec!["ROLE_USER".into()]);
        let token = generate_jwt(&claims).unwrap();
        let principal = Principal::from(validate_jwt(&token).unwrap());

        assert_eq!(principal.id, 5);
        assert_eq!(principal.email, "p@example.com");
        assert!(!principal.is_admin());
    }

    #[test]
    fn rejects_tampered_and_expired_tokens() {
        let claims = Claims::new(5, "p@example.com".into(), vec!["ROLE_ADMIN".into()]);
        let token = generate_jwt(&claims).unwrap();
        let tampered = format!("{}x", token);
        assert!(matches!(validate_jwt(&tampered), Err(AuthError::InvalidToken(_))));

        let mut expired = Claims::new(5, "p@example.com".into(), vec![]);
        expired.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt(&expired).unwrap();
        assert!(validate_jwt(&token).is_err());
    }

    #[test]
    fn admin_role_comes_from_config() {
        let admin = Principal {
            id: 1,
            email: "a@example.com".into(),
            roles: vec!["ROLE_USER".into(), config::DEFAULT_ADMIN_ROLE.into()],
        };
        assert!(admin.is_admin());
    }
}
