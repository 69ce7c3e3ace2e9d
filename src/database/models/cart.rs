use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cart line joined with the product details the storefront renders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartLineDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub product_name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}
