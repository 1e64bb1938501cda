// storefront/src/services/gateway.rs

//! Payment gateway adapter: remote intent creation and the HMAC signature
//! check that gates every payment confirmation.

use crate::config::GatewayConfig;
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentRequest {
  #[serde(rename = "amount")]
  pub amount_minor: i64,
  pub currency: String,
  pub receipt: String,
  pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayIntent {
  pub id: String,
  pub amount: i64,
  pub currency: String,
  pub status: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Public key id handed to clients for the payment popup.
  fn key_id(&self) -> &str;

  fn currency(&self) -> &str;

  async fn create_intent(&self, request: IntentRequest) -> AppResult<GatewayIntent>;

  /// Constant-time check of a popup signature against this gateway's secret.
  fn verify_payment_signature(&self, reference: &str, payment_id: &str, signature: &str) -> bool;
}

/// `round(amount * 100)`, midpoint away from zero.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
  (amount * Decimal::ONE_HUNDRED)
    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    .to_i64()
    .ok_or_else(|| AppError::Validation(format!("Amount {} is out of range", amount)))
}

fn signing_mac(reference: &str, payment_id: &str, secret: &str) -> Option<HmacSha256> {
  let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
  mac.update(reference.as_bytes());
  mac.update(b"|");
  mac.update(payment_id.as_bytes());
  Some(mac)
}

/// Lowercase hex of `HMAC-SHA256(secret, reference + "|" + payment_id)`.
pub fn compute_signature(reference: &str, payment_id: &str, secret: &str) -> String {
  signing_mac(reference, payment_id, secret)
    .map(|mac| hex::encode(mac.finalize().into_bytes()))
    .unwrap_or_default()
}

/// Malformed hex counts as a mismatch.
pub fn verify_signature(reference: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
  let Some(mac) = signing_mac(reference, payment_id, secret) else {
    return false;
  };
  match hex::decode(signature) {
    Ok(candidate) => mac.verify_slice(&candidate).is_ok(),
    Err(_) => false,
  }
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
  error: Option<GatewayErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
  description: Option<String>,
}

/// Razorpay-compatible REST adapter (`POST {base}/orders` with basic auth).
pub struct RazorpayGateway {
  http: reqwest::Client,
  base_url: String,
  key_id: String,
  key_secret: String,
  currency: String,
}

impl RazorpayGateway {
  pub fn new(config: &GatewayConfig) -> AppResult<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| AppError::Config(format!("Failed to build gateway HTTP client: {}", e)))?;
    Ok(Self {
      http,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      key_id: config.key_id.clone(),
      key_secret: config.key_secret.clone(),
      currency: config.currency.clone(),
    })
  }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
  fn key_id(&self) -> &str {
    &self.key_id
  }

  fn currency(&self) -> &str {
    &self.currency
  }

  #[instrument(
    name = "gateway::create_intent",
    skip(self, request),
    fields(receipt = %request.receipt, amount = request.amount_minor),
    err(Display)
  )]
  async fn create_intent(&self, request: IntentRequest) -> AppResult<GatewayIntent> {
    let response = self
      .http
      .post(format!("{}/orders", self.base_url))
      .basic_auth(&self.key_id, Some(&self.key_secret))
      .json(&request)
      .send()
      .await
      .map_err(|e| {
        if e.is_timeout() {
          AppError::Gateway("Payment gateway timed out".to_string())
        } else {
          warn!(error = %e.without_url(), "Payment gateway request failed.");
          AppError::Gateway("Payment gateway unreachable".to_string())
        }
      })?;

    let status = response.status();
    if !status.is_success() {
      let description = response
        .json::<GatewayErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.description)
        .unwrap_or_else(|| "no description".to_string());
      warn!(%status, %description, "Payment gateway rejected order creation.");
      return Err(AppError::Gateway(format!(
        "Gateway rejected order creation ({}): {}",
        status.as_u16(),
        description
      )));
    }

    let intent = response
      .json::<GatewayIntent>()
      .await
      .map_err(|_| AppError::Gateway("Unexpected response from payment gateway".to_string()))?;
    info!(gateway_order_id = %intent.id, "Gateway order created.");
    Ok(intent)
  }

  fn verify_payment_signature(&self, reference: &str, payment_id: &str, signature: &str) -> bool {
    verify_signature(reference, payment_id, signature, &self.key_secret)
  }
}
