// storefront/src/models/order.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
  /// Paid through the remote gateway popup; the only method with a payment sub-flow.
  #[serde(rename = "gateway", alias = "Razorpay", alias = "razorpay")]
  Gateway,
  #[serde(rename = "cash-on-delivery", alias = "COD", alias = "cod")]
  CashOnDelivery,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Gateway => "gateway",
      PaymentMethod::CashOnDelivery => "cash-on-delivery",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "gateway" | "Razorpay" | "razorpay" => Some(PaymentMethod::Gateway),
      "cash-on-delivery" | "COD" | "cod" => Some(PaymentMethod::CashOnDelivery),
      _ => None,
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  /// Product reference; opaque to this service.
  pub product: String,
  pub name: String,
  #[serde(default)]
  pub image: String,
  pub price: Decimal,
  #[serde(alias = "quantity")]
  pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
  pub address: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
}

impl ShippingAddress {
  /// Name of the first blank field, if any.
  pub fn first_blank_field(&self) -> Option<&'static str> {
    [
      ("address", &self.address),
      ("city", &self.city),
      ("postalCode", &self.postal_code),
      ("country", &self.country),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
  pub id: String,
  pub status: String,
  pub update_time: DateTime<Utc>,
  pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub order_items: Vec<OrderItem>,
  pub shipping_address: ShippingAddress,
  pub payment_method: PaymentMethod,
  pub items_price: Decimal,
  pub tax_price: Decimal,
  pub shipping_price: Decimal,
  pub total_price: Decimal,
  pub gateway_order_id: Option<String>,
  pub payment_result: Option<PaymentResult>,
  pub is_paid: bool,
  pub paid_at: Option<DateTime<Utc>>,
  pub is_delivered: bool,
  pub delivered_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Stored order totals are `NUMERIC(12,2)`: two decimals, below 10^10.
const PRICE_SCALE: u32 = 2;
const MAX_PRICE_EXCLUSIVE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Create-order request body. Totals are taken as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  #[serde(default)]
  pub order_items: Vec<OrderItem>,
  pub shipping_address: ShippingAddress,
  pub payment_method: PaymentMethod,
  pub items_price: Decimal,
  pub tax_price: Decimal,
  pub shipping_price: Decimal,
  pub total_price: Decimal,
}

impl NewOrder {
  /// Checks the request in a fixed order and reports the first violation.
  pub fn check(&self) -> Result<(), AppError> {
    if self.order_items.is_empty() {
      return Err(AppError::Validation("No order items".to_string()));
    }
    if let Some(field) = self.shipping_address.first_blank_field() {
      return Err(AppError::Validation(format!("Shipping address {} is required", field)));
    }
    for item in &self.order_items {
      if item.qty == 0 {
        return Err(AppError::Validation(format!("Item '{}' must have a quantity of at least 1", item.name)));
      }
      if item.price <= Decimal::ZERO {
        return Err(AppError::Validation(format!("Item '{}' must have a positive price", item.name)));
      }
    }
    let prices = [
      ("itemsPrice", self.items_price),
      ("taxPrice", self.tax_price),
      ("shippingPrice", self.shipping_price),
      ("totalPrice", self.total_price),
    ];
    for (field, value) in prices {
      if value < Decimal::ZERO {
        return Err(AppError::Validation(format!("{} cannot be negative", field)));
      }
      if value.normalize().scale() > PRICE_SCALE {
        return Err(AppError::Validation(format!(
          "{} must have at most {} decimal places",
          field, PRICE_SCALE
        )));
      }
      if value >= MAX_PRICE_EXCLUSIVE {
        return Err(AppError::Validation(format!("{} is too large", field)));
      }
    }
    Ok(())
  }
}

/// What the client needs to open the gateway popup. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayCheckout {
  pub gateway_order_id: String,
  pub key_id: String,
  /// Minor currency units.
  pub amount: i64,
  pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
  #[serde(flatten)]
  pub order: Order,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gateway: Option<GatewayCheckout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOwner {
  pub id: Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithOwner {
  #[serde(flatten)]
  pub order: Order,
  pub user: OrderOwner,
}

/// Proof returned by the gateway popup and submitted for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
  #[validate(length(min = 1, message = "gatewayOrderId is required"))]
  pub gateway_order_id: String,
  #[validate(length(min = 1, message = "gatewayPaymentId is required"))]
  pub gateway_payment_id: String,
  #[validate(length(min = 1, message = "signature is required"))]
  pub signature: String,
}
