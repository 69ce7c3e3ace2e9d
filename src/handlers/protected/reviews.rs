use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::validators;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// POST /api/reviews - Leave a review on a product
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<Value> {
    if !validators::is_valid_rating(payload.rating) {
        return Err(ApiError::validation_error("Rating must be between 1 and 5"));
    }

    let pool = DatabaseManager::pool().await?;

    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(&pool)
        .await?;
    if product.is_none() {
        return Err(ApiError::not_found("Product not found"));
    }

    let (review_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO reviews (product_id, user_id, rating, comment)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(payload.product_id)
    .bind(user.user_id)
    .bind(payload.rating)
    .bind(&payload.comment)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(json!({
        "message": "Review created",
        "review_id": review_id,
    })))
}
