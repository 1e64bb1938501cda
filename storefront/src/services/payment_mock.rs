// storefront/src/services/payment_mock.rs

use crate::errors::{AppError, Result as AppResult};
use crate::services::gateway::{verify_signature, GatewayIntent, IntentRequest, PaymentGateway};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand_core::{OsRng, RngCore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, instrument};

/// In-process gateway. Hands out `order_mock_<hex>` references, records every
/// intent it was asked for and can be switched into a failing mode.
pub struct MockGateway {
  key_id: String,
  key_secret: String,
  currency: String,
  latency: Duration,
  failing: AtomicBool,
  intents: Mutex<Vec<IntentRequest>>,
}

impl MockGateway {
  pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>, currency: impl Into<String>) -> Self {
    Self {
      key_id: key_id.into(),
      key_secret: key_secret.into(),
      currency: currency.into(),
      latency: Duration::ZERO,
      failing: AtomicBool::new(false),
      intents: Mutex::new(Vec::new()),
    }
  }

  /// Simulated network latency per intent.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  /// Intents successfully created so far, oldest first.
  pub fn created_intents(&self) -> Vec<IntentRequest> {
    self.intents.lock().clone()
  }
}

fn mock_reference() -> String {
  let mut bytes = [0u8; 8];
  OsRng.fill_bytes(&mut bytes);
  format!("order_mock_{}", hex::encode(bytes))
}

#[async_trait]
impl PaymentGateway for MockGateway {
  fn key_id(&self) -> &str {
    &self.key_id
  }

  fn currency(&self) -> &str {
    &self.currency
  }

  #[instrument(name = "mock_gateway::create_intent", skip(self, request), fields(receipt = %request.receipt, amount = request.amount_minor))]
  async fn create_intent(&self, request: IntentRequest) -> AppResult<GatewayIntent> {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    if self.failing.load(Ordering::SeqCst) {
      return Err(AppError::Gateway("Mock gateway is unavailable".to_string()));
    }

    let intent = GatewayIntent {
      id: mock_reference(),
      amount: request.amount_minor,
      currency: request.currency.clone(),
      status: "created".to_string(),
    };
    info!(gateway_order_id = %intent.id, "Mock gateway order created.");
    self.intents.lock().push(request);
    Ok(intent)
  }

  fn verify_payment_signature(&self, reference: &str, payment_id: &str, signature: &str) -> bool {
    verify_signature(reference, payment_id, signature, &self.key_secret)
  }
}
