// storefront/src/services/order_service.rs

//! Order operations. Creation and payment verification run as flows; reads go
//! straight to the store.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewOrder, Order, OrderCreated, OrderOwner, OrderWithOwner, PaymentProof, Session};
use crate::pipelines::contexts::{CreateOrderCtxData, VerifyPaymentCtxData};
use crate::state::AppState;
use flow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Validates and stores a new order for `session`. Gateway orders come back
/// with the details the client needs to open the payment popup.
#[instrument(
  name = "order_service::create_order",
  skip(state, session, input),
  fields(user_id = %session.user_id, payment_method = %input.payment_method),
  err(Display)
)]
pub async fn create_order(state: &AppState, session: &Session, input: NewOrder) -> AppResult<OrderCreated> {
  let ctx = ContextData::new(CreateOrderCtxData {
    app_state: state.clone(),
    session: session.clone(),
    input,
    order: None,
    gateway: None,
  });

  match state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let (order, gateway) = ctx.with(|data| (data.order.clone(), data.gateway.clone()));
      let order = order.ok_or_else(|| AppError::Internal("Order flow completed without an order.".to_string()))?;
      info!(order_id = %order.id, "Order created.");
      Ok(OrderCreated { order, gateway })
    }
    PipelineResult::Stopped => {
      warn!("Create-order flow was halted by a handler.");
      Err(AppError::Internal("Order creation was halted by an internal step.".to_string()))
    }
  }
}

/// Any authenticated caller may read any order by id; the owner's name and
/// email are attached when the owner still exists.
#[instrument(name = "order_service::get_order", skip(state, session), fields(requested_by = %session.user_id), err(Display))]
pub async fn get_order(state: &AppState, order_id: Uuid, session: &Session) -> AppResult<OrderWithOwner> {
  let order = state
    .orders
    .find(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  let user = match state.users.find(order.user_id).await? {
    Some(owner) => OrderOwner {
      id: owner.id,
      name: Some(owner.name),
      email: Some(owner.email),
    },
    None => OrderOwner {
      id: order.user_id,
      name: None,
      email: None,
    },
  };
  Ok(OrderWithOwner { order, user })
}

#[instrument(name = "order_service::list_orders_for_user", skip_all, fields(user_id = %session.user_id), err(Display))]
pub async fn list_orders_for_user(state: &AppState, session: &Session) -> AppResult<Vec<Order>> {
  state.orders.list_for_user(session.user_id).await
}

/// Confirms a gateway payment. Verifying an order that is already paid is a
/// no-op returning the stored order; a bad signature leaves it unpaid.
#[instrument(
  name = "order_service::verify_payment",
  skip(state, session, proof),
  fields(user_id = %session.user_id, gateway_payment_id = %proof.gateway_payment_id),
  err(Display)
)]
pub async fn verify_payment(
  state: &AppState,
  order_id: Uuid,
  session: &Session,
  proof: PaymentProof,
) -> AppResult<Order> {
  let ctx = ContextData::new(VerifyPaymentCtxData {
    app_state: state.clone(),
    session: session.clone(),
    order_id,
    proof,
    order: None,
    already_paid: false,
    signature_valid: false,
  });

  match state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => ctx
      .with(|data| data.order.clone())
      .ok_or_else(|| AppError::Internal("Payment flow completed without an order.".to_string())),
    PipelineResult::Stopped => Err(AppError::Verification("Invalid payment signature".to_string())),
  }
}
