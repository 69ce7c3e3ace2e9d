//! Checkout orchestrator: converts a user's cart into a durable order.
//!
//! The whole sequence runs inside one database transaction. Any failure
//! rolls back every write: no order, no stock change, no cart mutation
//! survives a failed attempt.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::PaymentType;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("shipping address is required")]
    MissingShippingAddress,

    #[error("insufficient stock for product {product_id}")]
    OutOfStock { product_id: Uuid },

    #[error(transparent)]
    Transaction(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub payment_type: PaymentType,
    pub payment_slip: Option<String>,
}

/// Cart line joined with the current product price, read inside the
/// checkout transaction (never a stale cached price).
#[derive(Debug, Clone, FromRow)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Sum of quantity x price over the cart, rounded to 2 decimal places.
pub fn order_total(lines: &[CheckoutLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum::<Decimal>()
        .round_dp(2)
}

/// Amount due up front: half the total for a deposit, otherwise the total.
pub fn paid_amount(total: Decimal, payment_type: PaymentType) -> Decimal {
    match payment_type {
        PaymentType::Full => total,
        PaymentType::Deposit => (total * Decimal::new(5, 1)).round_dp(2),
    }
}

/// Run the checkout transaction for `user_id` and return the new order id.
///
/// Steps, all inside one transaction:
/// 1. read the cart joined with current prices (fails with `EmptyCart` if
///    there is nothing to buy);
/// 2. compute the frozen total and paid amount;
/// 3. insert the order (status `pending`) and one item snapshot per line;
/// 4. decrement stock per line in product-id order, so concurrent checkouts
///    sharing products take row locks in the same order and cannot deadlock;
///    the decrement is guarded so stock cannot go negative, and a line that
///    would oversell fails the whole transaction with `OutOfStock`;
/// 5. clear the cart and commit.
pub async fn checkout(
    pool: &PgPool,
    user_id: Uuid,
    request: CheckoutRequest,
) -> Result<Uuid, CheckoutError> {
    if request.shipping_address.trim().is_empty() {
        return Err(CheckoutError::MissingShippingAddress);
    }

    let mut tx = pool.begin().await?;

    let lines: Vec<CheckoutLine> = sqlx::query_as(
        "SELECT c.product_id, c.quantity, p.price
         FROM cart_lines c
         JOIN products p ON p.id = c.product_id
         WHERE c.user_id = $1
         ORDER BY c.product_id",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        // Dropping the transaction rolls it back; nothing was written yet
        return Err(CheckoutError::EmptyCart);
    }

    let total = order_total(&lines);
    let paid = paid_amount(total, request.payment_type);

    let (order_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO orders (user_id, total_price, paid_amount, payment_type, payment_slip, shipping_address)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(user_id)
    .bind(total)
    .bind(paid)
    .bind(request.payment_type)
    .bind(&request.payment_slip)
    .bind(request.shipping_address.trim())
    .fetch_one(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.price)
        .execute(&mut *tx)
        .await?;

        // Guarded decrement: zero rows affected means the remaining stock
        // cannot cover this line, and the whole checkout fails
        let updated = sqlx::query(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
        )
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(CheckoutError::OutOfStock {
                product_id: line.product_id,
            });
        }
    }

    sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(%user_id, %order_id, %total, "order created");
    Ok(order_id)
}
