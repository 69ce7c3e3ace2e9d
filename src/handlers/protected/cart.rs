//! Cart endpoints. Every mutation is scoped to the calling user's rows,
//! so one user can never touch another's cart.

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::CartLineDetail;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/cart - The caller's cart, joined with product details
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<CartLineDetail>> {
    let pool = DatabaseManager::pool().await?;

    let lines: Vec<CartLineDetail> = sqlx::query_as(
        "SELECT c.id, c.product_id, c.quantity, p.name AS product_name, p.price, p.image_url
         FROM cart_lines c
         JOIN products p ON p.id = c.product_id
         WHERE c.user_id = $1
         ORDER BY c.id",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(lines))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// POST /api/cart - Upsert a cart line; quantities sum when the
/// (user, product) pair already exists
pub async fn add(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddToCartRequest>,
) -> ApiResult<Value> {
    if payload.quantity <= 0 {
        return Err(ApiError::validation_error("Quantity must be positive"));
    }

    let pool = DatabaseManager::pool().await?;

    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(&pool)
        .await?;
    if product.is_none() {
        return Err(ApiError::not_found("Product not found"));
    }

    sqlx::query(
        "INSERT INTO cart_lines (user_id, product_id, quantity)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, product_id)
         DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity",
    )
    .bind(user.user_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .execute(&pool)
    .await?;

    Ok(ApiResponse::created(json!({ "message": "Item added to cart" })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

/// PUT /api/cart/:id - Overwrite a line's quantity (owner-scoped)
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(cart_line_id): Path<Uuid>,
    Json(payload): Json<UpdateCartRequest>,
) -> ApiResult<Value> {
    if payload.quantity <= 0 {
        return Err(ApiError::validation_error("Quantity must be positive"));
    }

    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("UPDATE cart_lines SET quantity = $1 WHERE id = $2 AND user_id = $3")
        .bind(payload.quantity)
        .bind(cart_line_id)
        .bind(user.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Cart item not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "Cart updated" })))
}

/// DELETE /api/cart/:id - Remove a line (owner-scoped)
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(cart_line_id): Path<Uuid>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1 AND user_id = $2")
        .bind(cart_line_id)
        .bind(user.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Cart item not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "Item removed from cart" })))
}
