// storefront/src/client/wizard.rs

use crate::client::pricing::PriceSummary;
use crate::models::{NewOrder, OrderItem, PaymentMethod, ShippingAddress};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
  Shipping,
  PaymentMethod,
  Review,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
  #[error("Your cart is empty")]
  EmptyCart,

  #[error("Shipping address {0} is required")]
  MissingShippingField(&'static str),

  #[error("Cannot go to {attempted:?} from {current:?}")]
  OutOfOrder { current: WizardStep, attempted: WizardStep },
}

/// Shipping, then payment method, then review. Each step is only reachable
/// once the previous one has been filled in; going back keeps what was entered.
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
  items: Vec<OrderItem>,
  shipping: Option<ShippingAddress>,
  payment_method: Option<PaymentMethod>,
  step: WizardStep,
}

impl CheckoutWizard {
  pub fn new(items: Vec<OrderItem>) -> Result<Self, WizardError> {
    if items.is_empty() {
      return Err(WizardError::EmptyCart);
    }
    Ok(Self {
      items,
      shipping: None,
      payment_method: None,
      step: WizardStep::Shipping,
    })
  }

  pub fn step(&self) -> WizardStep {
    self.step
  }

  pub fn items(&self) -> &[OrderItem] {
    &self.items
  }

  pub fn shipping(&self) -> Option<&ShippingAddress> {
    self.shipping.as_ref()
  }

  pub fn payment_method(&self) -> Option<PaymentMethod> {
    self.payment_method
  }

  pub fn prices(&self) -> PriceSummary {
    PriceSummary::for_items(&self.items)
  }

  pub fn submit_shipping(&mut self, address: ShippingAddress) -> Result<WizardStep, WizardError> {
    if let Some(field) = address.first_blank_field() {
      return Err(WizardError::MissingShippingField(field));
    }
    self.shipping = Some(address);
    self.step = WizardStep::PaymentMethod;
    Ok(self.step)
  }

  pub fn choose_payment_method(&mut self, method: PaymentMethod) -> Result<WizardStep, WizardError> {
    if self.shipping.is_none() {
      return Err(WizardError::OutOfOrder {
        current: self.step,
        attempted: WizardStep::PaymentMethod,
      });
    }
    self.payment_method = Some(method);
    self.step = WizardStep::Review;
    Ok(self.step)
  }

  pub fn back(&mut self) -> WizardStep {
    self.step = match self.step {
      WizardStep::Review => WizardStep::PaymentMethod,
      WizardStep::PaymentMethod | WizardStep::Shipping => WizardStep::Shipping,
    };
    self.step
  }

  /// The create-order request for the review step, priced from the cart.
  pub fn review(&self) -> Result<NewOrder, WizardError> {
    let (Some(shipping), Some(payment_method)) = (&self.shipping, self.payment_method) else {
      return Err(WizardError::OutOfOrder {
        current: self.step,
        attempted: WizardStep::Review,
      });
    };
    if self.step != WizardStep::Review {
      return Err(WizardError::OutOfOrder {
        current: self.step,
        attempted: WizardStep::Review,
      });
    }

    let prices = self.prices();
    Ok(NewOrder {
      order_items: self.items.clone(),
      shipping_address: shipping.clone(),
      payment_method,
      items_price: prices.items_price,
      tax_price: prices.tax_price,
      shipping_price: prices.shipping_price,
      total_price: prices.total_price,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  fn cart() -> Vec<OrderItem> {
    vec![OrderItem {
      product: "p-1".to_string(),
      name: "Kettle".to_string(),
      image: "/kettle.jpg".to_string(),
      price: "600".parse().unwrap(),
      qty: 2,
    }]
  }

  fn address() -> ShippingAddress {
    ShippingAddress {
      address: "1 Main St".to_string(),
      city: "Pune".to_string(),
      postal_code: "411001".to_string(),
      country: "IN".to_string(),
    }
  }

  #[test]
  fn empty_cart_cannot_start_checkout() {
    assert_eq!(CheckoutWizard::new(Vec::new()).unwrap_err(), WizardError::EmptyCart);
  }

  #[test]
  fn steps_must_be_taken_in_order() {
    let mut wizard = CheckoutWizard::new(cart()).unwrap();
    assert_eq!(
      wizard.choose_payment_method(PaymentMethod::Gateway).unwrap_err(),
      WizardError::OutOfOrder {
        current: WizardStep::Shipping,
        attempted: WizardStep::PaymentMethod
      }
    );
    assert!(matches!(wizard.review(), Err(WizardError::OutOfOrder { .. })));
  }

  #[test]
  fn blank_shipping_field_is_rejected() {
    let mut wizard = CheckoutWizard::new(cart()).unwrap();
    let mut incomplete = address();
    incomplete.city = "  ".to_string();
    assert_eq!(
      wizard.submit_shipping(incomplete).unwrap_err(),
      WizardError::MissingShippingField("city")
    );
    assert_eq!(wizard.step(), WizardStep::Shipping);
  }

  #[test]
  fn review_produces_priced_order_request() {
    let mut wizard = CheckoutWizard::new(cart()).unwrap();
    assert_eq!(wizard.submit_shipping(address()).unwrap(), WizardStep::PaymentMethod);
    assert_eq!(wizard.choose_payment_method(PaymentMethod::Gateway).unwrap(), WizardStep::Review);

    let request = wizard.review().unwrap();
    assert_eq!(request.payment_method, PaymentMethod::Gateway);
    assert_eq!(request.items_price, Decimal::from(1200));
    assert_eq!(request.shipping_price, Decimal::ZERO);
    assert_eq!(request.tax_price, Decimal::from(180));
    assert_eq!(request.total_price, Decimal::from(1380));
    assert!(request.check().is_ok());
  }

  #[test]
  fn going_back_keeps_entries_but_blocks_review() {
    let mut wizard = CheckoutWizard::new(cart()).unwrap();
    wizard.submit_shipping(address()).unwrap();
    wizard.choose_payment_method(PaymentMethod::CashOnDelivery).unwrap();

    assert_eq!(wizard.back(), WizardStep::PaymentMethod);
    assert!(wizard.review().is_err());
    assert_eq!(wizard.payment_method(), Some(PaymentMethod::CashOnDelivery));

    wizard.choose_payment_method(PaymentMethod::Gateway).unwrap();
    assert_eq!(wizard.review().unwrap().payment_method, PaymentMethod::Gateway);
  }
}
