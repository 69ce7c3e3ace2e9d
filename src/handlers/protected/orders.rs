//! Order endpoints for the storefront user: history, detail, and checkout.

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Order, OrderItemDetail, PaymentType};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::checkout::{self, CheckoutRequest};

/// GET /api/orders - The caller's orders, newest first
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Order>> {
    let pool = DatabaseManager::pool().await?;

    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user.user_id)
            .fetch_all(&pool)
            .await?;

    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/:id - One order with its item snapshots (owner-scoped)
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user.user_id)
        .fetch_optional(&pool)
        .await?;

    let order = order.ok_or_else(|| ApiError::not_found("Order not found"))?;

    let items: Vec<OrderItemDetail> = sqlx::query_as(
        "SELECT oi.id, oi.product_id, oi.quantity, oi.unit_price, p.name AS product_name, p.image_url
         FROM order_items oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = $1",
    )
    .bind(order_id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(json!({
        "order": order,
        "items": items,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub payment_slip: Option<String>,
}

/// POST /api/orders - Checkout: convert the caller's cart into an order.
/// All-or-nothing; see `services::checkout`.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let order_id = checkout::checkout(
        &pool,
        user.user_id,
        CheckoutRequest {
            shipping_address: payload.shipping_address,
            payment_type: payload.payment_type,
            payment_slip: payload.payment_slip,
        },
    )
    .await?;

    Ok(ApiResponse::created(json!({
        "message": "Order created",
        "order_id": order_id,
    })))
}
