//! Admin order console: listing and the status state machine.

use axum::{extract::Path, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{OrderStatus, PaymentType};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// Order joined with buyer identity for the admin console
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub paid_amount: Decimal,
    pub payment_type: PaymentType,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub full_name: Option<String>,
    pub email: String,
}

/// GET /api/admin/orders - All orders, newest first
pub async fn list() -> ApiResult<Vec<AdminOrderRow>> {
    let pool = DatabaseManager::pool().await?;

    let orders: Vec<AdminOrderRow> = sqlx::query_as(
        "SELECT o.id, o.user_id, o.total_price, o.paid_amount, o.payment_type,
                o.shipping_address, o.status, o.remark, o.created_at,
                u.full_name, u.email
         FROM orders o
         JOIN users u ON u.id = o.user_id
         ORDER BY o.created_at DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(orders))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub remark: Option<String>,
}

/// PUT /api/admin/orders/:id - Move an order through its lifecycle.
/// The status is parsed by hand so unknown values surface as 400, and the
/// transition table rejects edges the state machine does not allow.
pub async fn update_status(
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Value> {
    let next: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| ApiError::validation_error(format!("Invalid status '{}'", payload.status)))?;

    let pool = DatabaseManager::pool().await?;

    let current: Option<(OrderStatus,)> = sqlx::query_as("SELECT status FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&pool)
        .await?;

    let (current,) = current.ok_or_else(|| ApiError::not_found("Order not found"))?;

    if !current.can_transition_to(next) {
        return Err(ApiError::validation_error(format!(
            "Cannot move order from '{}' to '{}'",
            current.as_str(),
            next.as_str()
        )));
    }

    // Conditional write: the update only lands if the order is still in the
    // status the transition was checked against. A concurrent admin request
    // that moved the order first makes this one fail instead of overwriting.
    let result = sqlx::query(
        "UPDATE orders SET status = $1, remark = COALESCE($2, remark)
         WHERE id = $3 AND status = $4",
    )
    .bind(next)
    .bind(&payload.remark)
    .bind(order_id)
    .bind(current)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict(
            "Order status changed concurrently, please retry",
        ));
    }

    tracing::info!(%order_id, from = current.as_str(), to = next.as_str(), "order status updated");

    Ok(ApiResponse::success(json!({ "message": "Order status updated" })))
}
