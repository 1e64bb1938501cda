// storefront/src/repos/orders.rs

use super::OrderRepo;
use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItem, PaymentMethod, PaymentResult, ShippingAddress};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{event, instrument, Level};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, user_id, order_items, shipping_address, payment_method, items_price, tax_price, \
   shipping_price, total_price, gateway_order_id, payment_result, is_paid, paid_at, is_delivered, delivered_at, \
   created_at, updated_at";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Uuid,
  order_items: Json<Vec<OrderItem>>,
  shipping_address: Json<ShippingAddress>,
  payment_method: String,
  items_price: Decimal,
  tax_price: Decimal,
  shipping_price: Decimal,
  total_price: Decimal,
  gateway_order_id: Option<String>,
  payment_result: Option<Json<PaymentResult>>,
  is_paid: bool,
  paid_at: Option<DateTime<Utc>>,
  is_delivered: bool,
  delivered_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = AppError;

  fn try_from(row: OrderRow) -> Result<Self> {
    let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
      AppError::Internal(format!("Order {} has unknown payment method '{}'", row.id, row.payment_method))
    })?;
    Ok(Order {
      id: row.id,
      user_id: row.user_id,
      order_items: row.order_items.0,
      shipping_address: row.shipping_address.0,
      payment_method,
      items_price: row.items_price,
      tax_price: row.tax_price,
      shipping_price: row.shipping_price,
      total_price: row.total_price,
      gateway_order_id: row.gateway_order_id,
      payment_result: row.payment_result.map(|json| json.0),
      is_paid: row.is_paid,
      paid_at: row.paid_at,
      is_delivered: row.is_delivered,
      delivered_at: row.delivered_at,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PgOrderRepo {
  pool: PgPool,
}

impl PgOrderRepo {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepo for PgOrderRepo {
  #[instrument(name = "orders::insert", skip(self, order), fields(order_id = %order.id), err(Display))]
  async fn insert(&self, order: &Order) -> Result<Order> {
    let sql = format!(
      "INSERT INTO orders ({ORDER_COLUMNS}) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
       RETURNING {ORDER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(order.id)
      .bind(order.user_id)
      .bind(Json(order.order_items.clone()))
      .bind(Json(order.shipping_address.clone()))
      .bind(order.payment_method.as_str())
      .bind(order.items_price)
      .bind(order.tax_price)
      .bind(order.shipping_price)
      .bind(order.total_price)
      .bind(order.gateway_order_id.as_deref())
      .bind(order.payment_result.clone().map(Json))
      .bind(order.is_paid)
      .bind(order.paid_at)
      .bind(order.is_delivered)
      .bind(order.delivered_at)
      .bind(order.created_at)
      .bind(order.updated_at)
      .fetch_one(&self.pool)
      .await?;
    event!(Level::DEBUG, "Order row inserted.");
    Order::try_from(row)
  }

  async fn find(&self, id: Uuid) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    row.map(Order::try_from).transpose()
  }

  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id");
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    rows.into_iter().map(Order::try_from).collect()
  }

  #[instrument(name = "orders::mark_paid", skip(self, result), fields(order_id = %id), err(Display))]
  async fn mark_paid(&self, id: Uuid, result: &PaymentResult, paid_at: DateTime<Utc>) -> Result<Option<Order>> {
    let sql = format!(
      "UPDATE orders SET is_paid = TRUE, paid_at = $2, payment_result = $3, updated_at = $2 \
       WHERE id = $1 AND is_paid = FALSE \
       RETURNING {ORDER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(id)
      .bind(paid_at)
      .bind(Json(result.clone()))
      .fetch_optional(&self.pool)
      .await?;
    row.map(Order::try_from).transpose()
  }
}

/// Orders kept in process memory, each tagged with its insertion sequence so
/// listings stay newest-first even when timestamps collide.
#[derive(Default)]
pub struct InMemoryOrderRepo {
  orders: RwLock<HashMap<Uuid, (u64, Order)>>,
}

impl InMemoryOrderRepo {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl OrderRepo for InMemoryOrderRepo {
  async fn insert(&self, order: &Order) -> Result<Order> {
    let mut orders = self.orders.write();
    if orders.contains_key(&order.id) {
      return Err(AppError::Internal(format!("Order {} already exists", order.id)));
    }
    let seq = orders.len() as u64;
    orders.insert(order.id, (seq, order.clone()));
    Ok(order.clone())
  }

  async fn find(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.orders.read().get(&id).map(|(_, order)| order.clone()))
  }

  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let orders = self.orders.read();
    let mut mine: Vec<&(u64, Order)> = orders.values().filter(|(_, order)| order.user_id == user_id).collect();
    mine.sort_by(|(seq_a, a), (seq_b, b)| b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a)));
    Ok(mine.into_iter().map(|(_, order)| order.clone()).collect())
  }

  async fn mark_paid(&self, id: Uuid, result: &PaymentResult, paid_at: DateTime<Utc>) -> Result<Option<Order>> {
    let mut orders = self.orders.write();
    match orders.get_mut(&id) {
      Some((_, order)) if !order.is_paid => {
        order.is_paid = true;
        order.paid_at = Some(paid_at);
        order.payment_result = Some(result.clone());
        order.updated_at = paid_at;
        Ok(Some(order.clone()))
      }
      _ => Ok(None),
    }
  }
}
