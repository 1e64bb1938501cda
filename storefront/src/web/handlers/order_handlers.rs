// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{NewOrder, PaymentProof, Session};
use crate::services::order_service;
use crate::state::AppState;

/// Unparseable ids are reported like unknown ones.
fn parse_order_id(raw: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Order not found".to_string()))
}

#[instrument(name = "handler::create_order", skip_all, fields(user_id = %session.user_id))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  session: Session,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let created = order_service::create_order(app_state.get_ref(), &session, payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(created))
}

#[instrument(name = "handler::my_orders", skip_all, fields(user_id = %session.user_id))]
pub async fn my_orders_handler(app_state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_orders_for_user(app_state.get_ref(), &session).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_order", skip(app_state, session), fields(user_id = %session.user_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  session: Session,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_order_id(&path)?;
  let order = order_service::get_order(app_state.get_ref(), order_id, &session).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::pay_order", skip(app_state, session, payload), fields(user_id = %session.user_id))]
pub async fn pay_order_handler(
  app_state: web::Data<AppState>,
  session: Session,
  path: web::Path<String>,
  payload: web::Json<PaymentProof>,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_order_id(&path)?;
  let proof = payload.into_inner();
  proof.validate()?;
  let order = order_service::verify_payment(app_state.get_ref(), order_id, &session, proof).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}
