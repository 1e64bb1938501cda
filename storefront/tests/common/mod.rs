// storefront/tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::models::{NewOrder, Session};
use storefront::repos::{InMemoryOrderRepo, InMemoryUserRepo, UserRepo};
use storefront::services::auth_service;
use storefront::services::gateway::compute_signature;
use storefront::services::payment_mock::MockGateway;
use storefront::state::AppState;

pub const GATEWAY_KEY_ID: &str = "rzp_test_public";
pub const GATEWAY_SECRET: &str = "gateway-test-secret";
pub const JWT_SECRET: &str = "jwt-test-secret";

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront=debug,flow=debug"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name: &str| match name {
    "JWT_SECRET" => Some(JWT_SECRET.to_string()),
    "PAYMENT_GATEWAY" => Some("mock".to_string()),
    "RAZORPAY_KEY_ID" => Some(GATEWAY_KEY_ID.to_string()),
    "RAZORPAY_KEY_SECRET" => Some(GATEWAY_SECRET.to_string()),
    _ => None,
  })
  .expect("test config")
}

pub struct TestApp {
  pub state: AppState,
  pub gateway: Arc<MockGateway>,
}

/// In-memory stores and a mock gateway that knows `GATEWAY_SECRET`.
pub fn test_app() -> TestApp {
  setup_tracing();
  let gateway = Arc::new(MockGateway::new(GATEWAY_KEY_ID, GATEWAY_SECRET, "INR"));
  let state = AppState::new(
    test_config(),
    Arc::new(InMemoryOrderRepo::new()),
    Arc::new(InMemoryUserRepo::new()),
    gateway.clone(),
  );
  TestApp { state, gateway }
}

/// Stores a user directly and returns its session and a valid token.
pub async fn seed_user(state: &AppState, name: &str, email: &str) -> (Session, String) {
  let hash = auth_service::hash_password("secret123").expect("hash");
  let user = state.users.create(name, email, &hash, false).await.expect("create user");
  let token = auth_service::issue_token(user.id, &user.email, JWT_SECRET, 7).expect("token");
  (Session::from(&user), token)
}

pub fn order_body(payment_method: &str) -> Value {
  json!({
    "orderItems": [
      { "product": "p-lamp", "name": "Desk Lamp", "image": "/img/lamp.jpg", "price": "499.50", "qty": 2 },
      { "product": "p-mug", "name": "Mug", "image": "/img/mug.jpg", "price": "0.50", "qty": 1 }
    ],
    "shippingAddress": { "address": "12 MG Road", "city": "Bengaluru", "postalCode": "560001", "country": "India" },
    "paymentMethod": payment_method,
    "itemsPrice": "999.50",
    "taxPrice": "149.93",
    "shippingPrice": "50.00",
    "totalPrice": "1199.43"
  })
}

pub fn new_order(payment_method: &str) -> NewOrder {
  serde_json::from_value(order_body(payment_method)).expect("valid order body")
}

/// What a successful gateway popup would hand back for `reference`.
pub fn signed_proof(reference: &str, payment_id: &str) -> Value {
  json!({
    "gatewayOrderId": reference,
    "gatewayPaymentId": payment_id,
    "signature": compute_signature(reference, payment_id, GATEWAY_SECRET),
  })
}
