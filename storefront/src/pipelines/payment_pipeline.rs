// storefront/src/pipelines/payment_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::PaymentResult;
use crate::pipelines::contexts::VerifyPaymentCtxData;
use chrono::Utc;
use flow::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{info, instrument, warn};

pub const PAYMENT_STATUS_SUCCESS: &str = "SUCCESS";

pub fn register_payment_pipeline(registry: &Registry<AppError>) {
  registry.register(verify_payment_pipeline());
  tracing::info!("Verify-payment pipeline registered.");
}

/// load → match reference → verify signature → mark paid.
///
/// A bad signature stops the flow after `verify_signature`; an order that is
/// already paid skips `mark_order_paid` and is returned as stored.
pub fn verify_payment_pipeline() -> Pipeline<VerifyPaymentCtxData, AppError> {
  let mut p = Pipeline::<VerifyPaymentCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("match_gateway_reference", false, None),
    ("verify_signature", false, None),
    ("mark_order_paid", false, None),
  ]);

  p.on("load_order", load_order);
  p.on("match_gateway_reference", match_gateway_reference);
  p.on("verify_signature", verify_signature);
  p.after("verify_signature", stop_on_signature_mismatch);
  p.on("mark_order_paid", mark_order_paid);
  p.skip_step_if("mark_order_paid", |data: &VerifyPaymentCtxData| data.already_paid);
  p
}

async fn load_order(ctx: ContextData<VerifyPaymentCtxData>) -> AppResult<PipelineControl> {
  let (orders, order_id) = ctx.with(|data| (data.app_state.orders.clone(), data.order_id));
  let order = orders
    .find(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  ctx.update(|data| {
    data.already_paid = order.is_paid;
    data.order = Some(order);
  });
  Ok(PipelineControl::Continue)
}

async fn match_gateway_reference(ctx: ContextData<VerifyPaymentCtxData>) -> AppResult<PipelineControl> {
  ctx.with(|data| -> AppResult<()> {
    let stored = data
      .order
      .as_ref()
      .and_then(|order| order.gateway_order_id.as_deref())
      .ok_or_else(|| AppError::Validation("Order has no gateway payment to verify".to_string()))?;
    if stored != data.proof.gateway_order_id {
      warn!(order_id = %data.order_id, "Gateway reference does not match the order.");
      return Err(AppError::Verification(
        "Payment reference does not match this order".to_string(),
      ));
    }
    Ok(())
  })?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "payment_step::verify_signature", skip_all)]
async fn verify_signature(ctx: ContextData<VerifyPaymentCtxData>) -> AppResult<PipelineControl> {
  ctx.update(|data| {
    let valid = data.app_state.gateway.verify_payment_signature(
      &data.proof.gateway_order_id,
      &data.proof.gateway_payment_id,
      &data.proof.signature,
    );
    data.signature_valid = valid;
  });
  Ok(PipelineControl::Continue)
}

async fn stop_on_signature_mismatch(ctx: ContextData<VerifyPaymentCtxData>) -> AppResult<PipelineControl> {
  let (valid, order_id) = ctx.with(|data| (data.signature_valid, data.order_id));
  if valid {
    return Ok(PipelineControl::Continue);
  }
  warn!(order_id = %order_id, "Payment signature mismatch; order left unpaid.");
  Ok(PipelineControl::Stop)
}

#[instrument(name = "payment_step::mark_order_paid", skip_all, err(Display))]
async fn mark_order_paid(ctx: ContextData<VerifyPaymentCtxData>) -> AppResult<PipelineControl> {
  let (orders, order_id, payment_id, email) = ctx.with(|data| {
    (
      data.app_state.orders.clone(),
      data.order_id,
      data.proof.gateway_payment_id.clone(),
      data.session.email.clone(),
    )
  });

  let now = Utc::now();
  let result = PaymentResult {
    id: payment_id,
    status: PAYMENT_STATUS_SUCCESS.to_string(),
    update_time: now,
    email_address: email,
  };
  let settled = match orders.mark_paid(order_id, &result, now).await? {
    Some(order) => {
      info!(%order_id, "Order marked as paid.");
      order
    }
    // Another confirmation won the race; report what it stored.
    None => orders
      .find(order_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?,
  };
  ctx.update(|data| data.order = Some(settled));
  Ok(PipelineControl::Continue)
}
