use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Order lifecycle. Transitions are admin-only and restricted to the edges
/// listed in `can_transition_to`; `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Cancelled,
    Completed,
}

impl OrderStatus {
    /// Explicit transition table. The legacy implementation accepted any
    /// known status value; illegal edges are now rejected up front.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Cancelled)
                | (Shipped, Completed)
                | (Shipped, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "completed" => Ok(OrderStatus::Completed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Full,
    Deposit,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Full
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub paid_amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_slip: Option<String>,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Frozen snapshot of one purchased line joined with product display
/// fields; unit_price is the product price at checkout time, decoupled
/// from later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub product_name: String,
    pub image_url: Option<String>,
}
