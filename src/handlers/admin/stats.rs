//! Admin dashboard aggregates.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::OrderStatus;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::presence::PresenceMap;

/// GET /api/admin/stats - Shop-wide counters for the dashboard.
/// Recognized revenue counts only `completed` orders; online visitors come
/// from the advisory presence map.
pub async fn stats() -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;

    let (product_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;

    let (order_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&pool)
        .await?;

    let (pending_orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE status = $1")
        .bind(OrderStatus::Pending)
        .fetch_one(&pool)
        .await?;

    let (revenue,): (Decimal,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE status = $1",
    )
    .bind(OrderStatus::Completed)
    .fetch_one(&pool)
    .await?;

    let online_visitors = PresenceMap::instance().online_count();

    Ok(ApiResponse::success(json!({
        "users": user_count,
        "products": product_count,
        "orders": order_count,
        "pending_orders": pending_orders,
        "revenue": revenue,
        "online_visitors": online_visitors,
    })))
}
