//! Public catalog reads: products and their reviews.

use axum::extract::Path;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Product, ReviewDetail};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/products - Full product listing
pub async fn list_products() -> ApiResult<Vec<Product>> {
    let pool = DatabaseManager::pool().await?;

    let products: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(products))
}

/// GET /api/products/:id - Single product
pub async fn get_product(Path(id): Path<Uuid>) -> ApiResult<Product> {
    let pool = DatabaseManager::pool().await?;

    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;

    product
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

/// GET /api/reviews/product/:product_id - Reviews for a product, newest first
pub async fn list_reviews(Path(product_id): Path<Uuid>) -> ApiResult<Vec<ReviewDetail>> {
    let pool = DatabaseManager::pool().await?;

    let reviews: Vec<ReviewDetail> = sqlx::query_as(
        "SELECT r.id, r.product_id, r.user_id, r.rating, r.comment, u.full_name, r.created_at
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         WHERE r.product_id = $1
         ORDER BY r.created_at DESC",
    )
    .bind(product_id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(reviews))
}
