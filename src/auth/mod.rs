use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: String, email: String, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            username,
            email,
            role,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
    Hashing(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            AuthError::InvalidSecret => write!(f, "Invalid JWT secret"),
            AuthError::Hashing(msg) => write!(f, "Password hashing error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "alice".to_string(),
            "alice@example.com".to_string(),
            "user".to_string(),
        );

        let token = generate_jwt(&claims).expect("token");
        let decoded = verify_jwt(&token).expect("claims");

        assert_eq!(decoded.user_id, user_id);
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.role, "user");
        assert!(!decoded.is_admin());
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "bob".to_string(),
            "bob@example.com".to_string(),
            "admin".to_string(),
        );
        let mut token = generate_jwt(&claims).expect("token");
        token.push('x');

        assert!(verify_jwt(&token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("secret123").expect("hash");
        assert!(verify_password("secret123", &hash).expect("verify"));
        assert!(!verify_password("wrong", &hash).expect("verify"));
    }
}
