// storefront/src/pipelines/order_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{GatewayCheckout, Order, PaymentMethod};
use crate::pipelines::contexts::CreateOrderCtxData;
use crate::services::gateway::{to_minor_units, IntentRequest};
use chrono::Utc;
use flow::{ContextData, Pipeline, PipelineControl, Registry, SkipCondition};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{event, info, instrument, Level};
use uuid::Uuid;

/// Registers the create-order flow with the registry.
pub fn register_order_pipeline(registry: &Registry<AppError>) {
  registry.register(create_order_pipeline());
  tracing::info!("Create-order pipeline registered.");
}

/// validate → assign identity → gateway intent (gateway orders only) → persist.
///
/// The single insert happens after the gateway call, so a gateway failure
/// leaves nothing behind.
pub fn create_order_pipeline() -> Pipeline<CreateOrderCtxData, AppError> {
  let not_gateway: SkipCondition<CreateOrderCtxData> =
    Arc::new(|data: &CreateOrderCtxData| data.input.payment_method != PaymentMethod::Gateway);

  let mut p = Pipeline::<CreateOrderCtxData, AppError>::new(&[
    ("validate_order_input", false, None),
    ("assign_order_identity", false, None),
    ("create_gateway_intent", false, Some(not_gateway)),
    ("persist_order", false, None),
  ]);

  p.on("validate_order_input", validate_order_input);
  p.on("assign_order_identity", assign_order_identity);
  p.on("create_gateway_intent", create_gateway_intent);
  p.before("persist_order", stamp_order_timestamps);
  p.on("persist_order", persist_order);
  p
}

#[instrument(name = "order_step::validate_order_input", skip_all, err(Display))]
async fn validate_order_input(ctx: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  ctx.with(|data| data.input.check())?;
  Ok(PipelineControl::Continue)
}

async fn assign_order_identity(ctx: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let now = Utc::now();
  ctx.update(|data| {
    let input = &data.input;
    let order = Order {
      id: Uuid::new_v4(),
      user_id: data.session.user_id,
      order_items: input.order_items.clone(),
      shipping_address: input.shipping_address.clone(),
      payment_method: input.payment_method,
      items_price: input.items_price,
      tax_price: input.tax_price,
      shipping_price: input.shipping_price,
      total_price: input.total_price,
      gateway_order_id: None,
      payment_result: None,
      is_paid: false,
      paid_at: None,
      is_delivered: false,
      delivered_at: None,
      created_at: now,
      updated_at: now,
    };
    event!(Level::DEBUG, order_id = %order.id, "Order identity assigned.");
    data.order = Some(order);
  });
  Ok(PipelineControl::Continue)
}

#[instrument(name = "order_step::create_gateway_intent", skip_all, err(Display))]
async fn create_gateway_intent(ctx: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (gateway, order_id, user_id, total_price) = ctx.with(|data| {
    (
      data.app_state.gateway.clone(),
      data.order.as_ref().map(|o| o.id),
      data.session.user_id,
      data.input.total_price,
    )
  });
  let order_id = order_id.ok_or_else(|| AppError::Internal("Order identity missing before gateway call.".to_string()))?;

  let amount_minor = to_minor_units(total_price)?;
  if amount_minor <= 0 {
    return Err(AppError::Validation(
      "Order total must be greater than zero for gateway payment".to_string(),
    ));
  }

  let mut notes = BTreeMap::new();
  notes.insert("order_id".to_string(), order_id.to_string());
  notes.insert("user_id".to_string(), user_id.to_string());
  let intent = gateway
    .create_intent(IntentRequest {
      amount_minor,
      currency: gateway.currency().to_string(),
      receipt: order_id.to_string(),
      notes,
    })
    .await?;

  let checkout = GatewayCheckout {
    gateway_order_id: intent.id.clone(),
    key_id: gateway.key_id().to_string(),
    amount: intent.amount,
    currency: intent.currency,
  };
  ctx.update(|data| {
    if let Some(order) = data.order.as_mut() {
      order.gateway_order_id = Some(intent.id);
    }
    data.gateway = Some(checkout);
  });
  Ok(PipelineControl::Continue)
}

async fn stamp_order_timestamps(ctx: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let now = Utc::now();
  ctx.update(|data| {
    if let Some(order) = data.order.as_mut() {
      order.created_at = now;
      order.updated_at = now;
    }
  });
  Ok(PipelineControl::Continue)
}

#[instrument(name = "order_step::persist_order", skip_all, err(Display))]
async fn persist_order(ctx: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (orders, order) = ctx.with(|data| (data.app_state.orders.clone(), data.order.clone()));
  let order = order.ok_or_else(|| AppError::Internal("No order to persist.".to_string()))?;

  let stored = orders.insert(&order).await?;
  info!(order_id = %stored.id, gateway_order_id = ?stored.gateway_order_id, "Order persisted.");
  ctx.update(|data| data.order = Some(stored));
  Ok(PipelineControl::Continue)
}
