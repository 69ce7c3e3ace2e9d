use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::validators;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/auth/me - The stored user row behind the presented token.
/// 404 if the account was deleted after the token was issued.
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;

    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&pool)
        .await?;

    row.map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// PUT /api/profile - Update the caller's contact details
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Value> {
    if let Some(phone) = payload.phone.as_deref() {
        if !validators::is_valid_phone(phone) {
            return Err(ApiError::validation_error("Invalid phone number"));
        }
    }

    let pool = DatabaseManager::pool().await?;

    sqlx::query("UPDATE users SET full_name = $1, phone = $2, address = $3 WHERE id = $4")
        .bind(&payload.full_name)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(user.user_id)
        .execute(&pool)
        .await?;

    Ok(ApiResponse::success(json!({ "message": "Profile updated" })))
}
