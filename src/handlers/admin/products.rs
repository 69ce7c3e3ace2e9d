//! Admin product management. These are the only write paths to the catalog
//! besides the checkout stock decrement.

use axum::{extract::Path, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::validators;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

fn validate(payload: &ProductPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation_error("Product name required"));
    }
    if !validators::is_valid_price(payload.price) {
        return Err(ApiError::validation_error("Invalid price"));
    }
    if payload.stock < 0 {
        return Err(ApiError::validation_error("Stock cannot be negative"));
    }
    Ok(())
}

/// POST /api/admin/products
pub async fn create(Json(payload): Json<ProductPayload>) -> ApiResult<Value> {
    validate(&payload)?;

    let pool = DatabaseManager::pool().await?;

    let (product_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO products (name, description, category, price, stock, image_url)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(payload.price)
    .bind(payload.stock)
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(json!({
        "message": "Product created",
        "product_id": product_id,
    })))
}

/// PUT /api/admin/products/:id - Full overwrite of the product row
pub async fn update(
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Value> {
    validate(&payload)?;

    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query(
        "UPDATE products
         SET name = $1, description = $2, category = $3, price = $4, stock = $5, image_url = $6
         WHERE id = $7",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(payload.price)
    .bind(payload.stock)
    .bind(&payload.image_url)
    .bind(product_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "Product updated" })))
}

/// DELETE /api/admin/products/:id
pub async fn delete(Path(product_id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(ApiResponse::success(json!({ "message": "Product deleted" })))
}
