//! Admin user management.

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/admin/users - All accounts, newest first.
/// Password hashes never serialize (see the User model).
pub async fn list() -> ApiResult<Vec<User>> {
    let pool = DatabaseManager::pool().await?;

    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(users))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// PUT /api/admin/users/:id/role
pub async fn update_role(
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Value> {
    if payload.role != "user" && payload.role != "admin" {
        return Err(ApiError::validation_error("Invalid role"));
    }

    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(&payload.role)
        .bind(user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "User role updated" })))
}

/// DELETE /api/admin/users/:id - Admins cannot delete themselves
pub async fn delete(
    Extension(admin): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Value> {
    if admin.user_id == user_id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "User deleted" })))
}
