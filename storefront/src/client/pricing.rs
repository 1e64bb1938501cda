// storefront/src/client/pricing.rs

use crate::models::OrderItem;
use rust_decimal::{Decimal, RoundingStrategy};

/// Orders whose items total more than this ship for free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
const FLAT_SHIPPING: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// 15%.
const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Prices shown on the review step and submitted with the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSummary {
  pub items_price: Decimal,
  pub shipping_price: Decimal,
  pub tax_price: Decimal,
  pub total_price: Decimal,
}

fn to_cents(value: Decimal) -> Decimal {
  value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PriceSummary {
  /// The total is summed before any rounding, then every figure is rounded
  /// to two decimals.
  pub fn for_items(items: &[OrderItem]) -> Self {
    let items_price: Decimal = items.iter().map(|item| item.price * Decimal::from(item.qty)).sum();
    let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
      Decimal::ZERO
    } else {
      FLAT_SHIPPING
    };
    let tax_price = items_price * TAX_RATE;
    let total_price = items_price + shipping_price + tax_price;

    Self {
      items_price: to_cents(items_price),
      shipping_price: to_cents(shipping_price),
      tax_price: to_cents(tax_price),
      total_price: to_cents(total_price),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(price: &str, qty: u32) -> OrderItem {
    OrderItem {
      product: "p".to_string(),
      name: "Thing".to_string(),
      image: String::new(),
      price: price.parse().unwrap(),
      qty,
    }
  }

  fn dec(raw: &str) -> Decimal {
    raw.parse().unwrap()
  }

  #[test]
  fn small_orders_pay_flat_shipping() {
    let summary = PriceSummary::for_items(&[item("100", 2), item("49.99", 1)]);
    assert_eq!(summary.items_price, dec("249.99"));
    assert_eq!(summary.shipping_price, dec("50"));
    assert_eq!(summary.tax_price, dec("37.50"));
    assert_eq!(summary.total_price, dec("337.49"));
  }

  #[test]
  fn shipping_is_free_strictly_above_threshold() {
    let at = PriceSummary::for_items(&[item("1000", 1)]);
    assert_eq!(at.shipping_price, dec("50"));

    let above = PriceSummary::for_items(&[item("999.5", 1), item("0.51", 1)]);
    assert_eq!(above.shipping_price, Decimal::ZERO);
    assert_eq!(above.items_price, dec("1000.01"));
    assert_eq!(above.tax_price, dec("150.00"));
    assert_eq!(above.total_price, dec("1150.01"));
  }

  #[test]
  fn tax_rounds_half_away_from_zero() {
    let summary = PriceSummary::for_items(&[item("0.10", 1)]);
    assert_eq!(summary.tax_price, dec("0.02"));
    assert_eq!(summary.total_price, dec("50.12"));
  }

  #[test]
  fn empty_cart_still_charges_shipping() {
    let summary = PriceSummary::for_items(&[]);
    assert_eq!(summary.items_price, Decimal::ZERO);
    assert_eq!(summary.total_price, dec("50"));
  }
}
