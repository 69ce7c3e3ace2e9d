use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Bearer-token authentication middleware; validates the token and injects
/// an `AuthUser` extension for downstream handlers
pub async fn auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers)?;

    let claims = auth::verify_jwt(&token).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Admin gate, layered after `auth_middleware` on admin routers
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    if !user.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

/// Extract the token from the Authorization header. Clients send either
/// `Bearer <token>` or the raw token.
fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized("No token provided"));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_bearer_prefixed_and_raw_tokens() {
        assert_eq!(
            extract_token_from_headers(&headers_with("Bearer abc123")).unwrap(),
            "abc123"
        );
        assert_eq!(
            extract_token_from_headers(&headers_with("abc123")).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn rejects_missing_or_empty_tokens() {
        assert!(extract_token_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_token_from_headers(&headers_with("Bearer ")).is_err());
    }
}
