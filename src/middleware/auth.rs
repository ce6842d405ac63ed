use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, AuthError, Principal};

/// Outcome of authenticating a request.
///
/// Resolution never rejects by itself; the resource decides whether an
/// anonymous caller may proceed (only OPTIONS may).
#[derive(Clone, Debug)]
pub enum Authentication {
    Principal(Principal),
    Anonymous,
}

impl Authentication {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Authentication::Principal(principal) => Some(principal),
            Authentication::Anonymous => None,
        }
    }
}

/// Resolve the bearer token, if any, into an `Authentication` extension
pub async fn authenticate(mut request: Request, next: Next) -> Response {
    let authentication = match resolve(request.headers()) {
        Ok(principal) => Authentication::Principal(principal),
        Err(AuthError::MissingHeader) => Authentication::Anonymous,
        Err(e) => {
            tracing::debug!("Rejecting credentials on {}: {}", request.uri().path(), e);
            Authentication::Anonymous
        }
    };

    request.extensions_mut().insert(authentication);
    next.run(request).await
}

fn resolve(headers: &HeaderMap) -> Result<Principal, AuthError> {
    let token = extract_jwt_from_headers(headers)?;
    let claims = validate_jwt(&token)?;
    Ok(Principal::from(claims))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidScheme)?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(token.trim().to_string())
    } else {
        Err(AuthError::InvalidScheme)
    }
}
