// storefront/src/client/api.rs

//! Typed client for the storefront HTTP API.

use crate::models::{AuthenticatedUser, NewOrder, Order, OrderCreated, OrderWithOwner, PaymentProof};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
  /// The request never produced a response (connection, timeout, decoding).
  #[error("Transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("API error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Not authenticated")]
  NotAuthenticated,
}

impl ClientError {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      ClientError::Api { status, .. } => StatusCode::from_u16(*status).ok(),
      _ => None,
    }
  }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaidOrder {
  order: Order,
}

#[derive(Serialize)]
struct Credentials<'a> {
  email: &'a str,
  password: &'a str,
}

#[derive(Clone)]
pub struct StorefrontApi {
  http: reqwest::Client,
  base_url: String,
  token: Option<String>,
}

impl StorefrontApi {
  /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      token: None,
    })
  }

  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.http.request(method, format!("{}/api{}", self.base_url, path))
  }

  fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
    let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
    Ok(self.request(method, path).bearer_auth(token))
  }

  async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
      return Ok(response.json::<T>().await?);
    }
    let message = response
      .json::<ErrorBody>()
      .await
      .ok()
      .and_then(|body| body.error)
      .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
    Err(ClientError::Api {
      status: status.as_u16(),
      message,
    })
  }

  /// Registers and keeps the issued token for later calls.
  pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<AuthenticatedUser, ClientError> {
    let body = json!({ "name": name, "email": email, "password": password });
    let user: AuthenticatedUser = Self::send(self.request(Method::POST, "/users").json(&body)).await?;
    self.token = Some(user.token.clone());
    Ok(user)
  }

  /// Logs in and keeps the issued token for later calls.
  pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthenticatedUser, ClientError> {
    let user: AuthenticatedUser =
      Self::send(self.request(Method::POST, "/users/login").json(&Credentials { email, password })).await?;
    self.token = Some(user.token.clone());
    Ok(user)
  }

  pub async fn create_order(&self, order: &NewOrder) -> Result<OrderCreated, ClientError> {
    Self::send(self.authed(Method::POST, "/orders")?.json(order)).await
  }

  pub async fn get_order(&self, order_id: Uuid) -> Result<OrderWithOwner, ClientError> {
    Self::send(self.authed(Method::GET, &format!("/orders/{}", order_id))?).await
  }

  pub async fn my_orders(&self) -> Result<Vec<Order>, ClientError> {
    Self::send(self.authed(Method::GET, "/orders/mine")?).await
  }

  pub async fn pay_order(&self, order_id: Uuid, proof: &PaymentProof) -> Result<Order, ClientError> {
    let paid: PaidOrder = Self::send(self.authed(Method::PUT, &format!("/orders/{}/pay", order_id))?.json(proof)).await?;
    Ok(paid.order)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn protected_calls_need_a_token() {
    let api = StorefrontApi::new("http://127.0.0.1:9").unwrap();
    assert!(matches!(api.my_orders().await, Err(ClientError::NotAuthenticated)));
    assert!(matches!(api.get_order(Uuid::new_v4()).await, Err(ClientError::NotAuthenticated)));
  }

  #[test]
  fn api_errors_expose_status() {
    let err = ClientError::Api {
      status: 404,
      message: "Order not found".to_string(),
    };
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "API error (404): Order not found");
    assert_eq!(ClientError::NotAuthenticated.status(), None);
  }
}
