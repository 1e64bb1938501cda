// storefront/src/pipelines/contexts.rs

//! Data carried through each flow. Handlers receive these wrapped in
//! `flow::ContextData`.

use crate::models::{GatewayCheckout, NewOrder, Order, PaymentProof, Session, User};
use crate::state::AppState;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CreateOrderCtxData {
  pub app_state: AppState,
  pub session: Session,
  pub input: NewOrder,
  /// Built by `assign_order_identity`, replaced by the stored copy on persist.
  pub order: Option<Order>,
  pub gateway: Option<GatewayCheckout>,
}

#[derive(Clone)]
pub struct VerifyPaymentCtxData {
  pub app_state: AppState,
  pub session: Session,
  pub order_id: Uuid,
  pub proof: PaymentProof,
  pub order: Option<Order>,
  pub already_paid: bool,
  pub signature_valid: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
  #[validate(length(min = 1, message = "Name is required"))]
  pub name: String,
  #[validate(email(message = "Valid email is required"))]
  pub email: String,
  #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
  pub password: String,
  /// Legacy signup flag; stored as `isAdmin`.
  #[serde(default, alias = "isHost")]
  pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
  #[validate(email(message = "Valid email is required"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub input: RegisterInput,
  pub user: Option<User>,
  pub token: Option<String>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub input: LoginInput,
  pub user: Option<User>,
  pub token: Option<String>,
}
