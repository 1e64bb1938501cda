// storefront/src/client/checkout.rs

//! Two-phase checkout: create the order, then (for gateway orders) collect a
//! payment proof from a prompt and have the server verify it.
//!
//! A failure before the order exists means the whole checkout can be retried.
//! Anything after that leaves a `PendingPayment` that can be retried on its own
//! against the same order and gateway reference.

use crate::client::api::{ClientError, StorefrontApi};
use crate::models::{GatewayCheckout, NewOrder, Order, PaymentMethod, PaymentProof};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A created gateway order that still awaits confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
  pub order: Order,
  pub gateway: GatewayCheckout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Initiated {
  /// Nothing left to pay online.
  Completed(Order),
  AwaitingPayment(PendingPayment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
  Approved(PaymentProof),
  Dismissed,
}

/// The payment confirmation UI. Implementations show the gateway popup for
/// `pending.gateway` and hand back whatever proof it produced.
#[async_trait]
pub trait PaymentPrompt: Send + Sync {
  async fn present(&self, pending: &PendingPayment) -> PromptOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingReason {
  Dismissed,
  /// The server refused the proof.
  Rejected(String),
  /// The verification request did not get an answer.
  Unreachable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
  Completed(Order),
  PaymentPending {
    pending: PendingPayment,
    reason: PendingReason,
  },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Order was not created: {0}")]
  OrderNotCreated(#[source] ClientError),

  #[error("Order {0} was created without gateway details")]
  MissingGatewayDetails(uuid::Uuid),
}

pub struct CheckoutClient {
  api: StorefrontApi,
}

impl CheckoutClient {
  pub fn new(api: StorefrontApi) -> Self {
    Self { api }
  }

  pub fn api(&self) -> &StorefrontApi {
    &self.api
  }

  /// Phase one: create the order.
  #[instrument(name = "checkout::initiate", skip_all, fields(payment_method = %request.payment_method))]
  pub async fn initiate(&self, request: &NewOrder) -> Result<Initiated, CheckoutError> {
    let created = self
      .api
      .create_order(request)
      .await
      .map_err(CheckoutError::OrderNotCreated)?;
    info!(order_id = %created.order.id, "Order created.");

    match (created.order.payment_method, created.gateway) {
      (PaymentMethod::Gateway, Some(gateway)) => Ok(Initiated::AwaitingPayment(PendingPayment {
        order: created.order,
        gateway,
      })),
      (PaymentMethod::Gateway, None) => Err(CheckoutError::MissingGatewayDetails(created.order.id)),
      (_, _) => Ok(Initiated::Completed(created.order)),
    }
  }

  /// Phase two: submit the proof for the pending order.
  #[instrument(name = "checkout::confirm", skip_all, fields(order_id = %pending.order.id))]
  pub async fn confirm(&self, pending: &PendingPayment, proof: &PaymentProof) -> Result<Order, ClientError> {
    self.api.pay_order(pending.order.id, proof).await
  }

  /// Runs both phases with `prompt` as the confirmation UI.
  pub async fn place_order(
    &self,
    request: &NewOrder,
    prompt: &dyn PaymentPrompt,
  ) -> Result<CheckoutOutcome, CheckoutError> {
    match self.initiate(request).await? {
      Initiated::Completed(order) => Ok(CheckoutOutcome::Completed(order)),
      Initiated::AwaitingPayment(pending) => Ok(self.settle(pending, prompt).await),
    }
  }

  /// Prompts again for an order that was created but never confirmed.
  pub async fn retry_payment(&self, pending: PendingPayment, prompt: &dyn PaymentPrompt) -> CheckoutOutcome {
    self.settle(pending, prompt).await
  }

  async fn settle(&self, pending: PendingPayment, prompt: &dyn PaymentPrompt) -> CheckoutOutcome {
    let proof = match prompt.present(&pending).await {
      PromptOutcome::Approved(proof) => proof,
      PromptOutcome::Dismissed => {
        info!(order_id = %pending.order.id, "Payment prompt dismissed.");
        return CheckoutOutcome::PaymentPending {
          pending,
          reason: PendingReason::Dismissed,
        };
      }
    };

    match self.confirm(&pending, &proof).await {
      Ok(order) => CheckoutOutcome::Completed(order),
      Err(ClientError::Api { message, .. }) => {
        warn!(order_id = %pending.order.id, %message, "Payment verification rejected.");
        CheckoutOutcome::PaymentPending {
          pending,
          reason: PendingReason::Rejected(message),
        }
      }
      Err(other) => CheckoutOutcome::PaymentPending {
        pending,
        reason: PendingReason::Unreachable(other.to_string()),
      },
    }
  }
}
