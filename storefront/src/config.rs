// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;

/// Which payment gateway adapter the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
  Razorpay,
  Mock,
}

#[derive(Clone)]
pub struct GatewayConfig {
  pub kind: GatewayKind,
  /// Public key id; safe to hand to clients.
  pub key_id: String,
  pub key_secret: String,
  pub base_url: String,
  pub currency: String,
  pub timeout_secs: u64,
}

impl fmt::Debug for GatewayConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GatewayConfig")
      .field("kind", &self.kind)
      .field("key_id", &self.key_id)
      .field("key_secret", &"[REDACTED]")
      .field("base_url", &self.base_url)
      .field("currency", &self.currency)
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the service on the in-memory stores.
  pub database_url: Option<String>,
  pub jwt_secret: String,
  pub jwt_ttl_days: i64,
  pub gateway: GatewayConfig,
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("jwt_secret", &"[REDACTED]")
      .field("jwt_ttl_days", &self.jwt_ttl_days)
      .field("gateway", &self.gateway)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source; `from_env` passes the
  /// process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let require = |name: &str| {
      get_env(name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), 5000u16)?;
    let database_url = get_env("DATABASE_URL");
    let jwt_secret = require("JWT_SECRET")?;
    let jwt_ttl_days = parse_var("JWT_TTL_DAYS", get_env("JWT_TTL_DAYS"), 7i64)?;
    if jwt_ttl_days <= 0 {
      return Err(AppError::Config("JWT_TTL_DAYS must be positive".to_string()));
    }

    let kind = match get_env("PAYMENT_GATEWAY").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("razorpay") => GatewayKind::Razorpay,
      Some("mock") => GatewayKind::Mock,
      Some(other) => {
        return Err(AppError::Config(format!("Unsupported PAYMENT_GATEWAY '{}'", other)));
      }
    };
    let (key_id, key_secret) = match kind {
      GatewayKind::Razorpay => (require("RAZORPAY_KEY_ID")?, require("RAZORPAY_KEY_SECRET")?),
      GatewayKind::Mock => (
        get_env("RAZORPAY_KEY_ID").unwrap_or_else(|| "rzp_test_mock".to_string()),
        get_env("RAZORPAY_KEY_SECRET").unwrap_or_else(|| "mock_secret".to_string()),
      ),
    };
    let gateway = GatewayConfig {
      kind,
      key_id,
      key_secret,
      base_url: get_env("GATEWAY_BASE_URL")
        .unwrap_or_else(|| "https://api.razorpay.com/v1".to_string())
        .trim_end_matches('/')
        .to_string(),
      currency: get_env("GATEWAY_CURRENCY").unwrap_or_else(|| "INR".to_string()),
      timeout_secs: parse_var("GATEWAY_TIMEOUT_SECS", get_env("GATEWAY_TIMEOUT_SECS"), 10u64)?,
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      jwt_ttl_days,
      gateway,
    })
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
  }
}
