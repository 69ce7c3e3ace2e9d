use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Review joined with the reviewer's display name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
