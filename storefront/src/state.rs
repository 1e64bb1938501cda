// storefront/src/state.rs

use crate::config::{AppConfig, GatewayKind};
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::repos::{InMemoryOrderRepo, InMemoryUserRepo, OrderRepo, PgOrderRepo, PgUserRepo, UserRepo};
use crate::services::gateway::{PaymentGateway, RazorpayGateway};
use crate::services::payment_mock::MockGateway;
use flow::Registry;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub orders: Arc<dyn OrderRepo>,
  pub users: Arc<dyn UserRepo>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub flows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the given stores and gateway and registers every flow.
  pub fn new(
    config: AppConfig,
    orders: Arc<dyn OrderRepo>,
    users: Arc<dyn UserRepo>,
    gateway: Arc<dyn PaymentGateway>,
  ) -> Self {
    let flows = Arc::new(Registry::<AppError>::new());
    pipelines::register_all_pipelines(&flows);
    Self {
      orders,
      users,
      gateway,
      flows,
      config: Arc::new(config),
    }
  }

  /// Builds the state the server runs with: Postgres when `DATABASE_URL` is
  /// set (migrations applied), in-memory stores otherwise.
  pub async fn from_config(config: AppConfig) -> Result<Self> {
    let gateway: Arc<dyn PaymentGateway> = match config.gateway.kind {
      GatewayKind::Razorpay => Arc::new(RazorpayGateway::new(&config.gateway)?),
      GatewayKind::Mock => Arc::new(MockGateway::new(
        config.gateway.key_id.clone(),
        config.gateway.key_secret.clone(),
        config.gateway.currency.clone(),
      )),
    };

    let (orders, users): (Arc<dyn OrderRepo>, Arc<dyn UserRepo>) = match &config.database_url {
      Some(url) => {
        let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
        info!("Successfully connected to the database.");
        sqlx::migrate!("./migrations")
          .run(&pool)
          .await
          .map_err(|e| AppError::Internal(format!("Database migration failed: {}", e)))?;
        (Arc::new(PgOrderRepo::new(pool.clone())), Arc::new(PgUserRepo::new(pool)))
      }
      None => {
        info!("DATABASE_URL not set; using in-memory stores.");
        (Arc::new(InMemoryOrderRepo::new()), Arc::new(InMemoryUserRepo::new()))
      }
    };

    info!(gateway = ?config.gateway.kind, "Application state ready.");
    Ok(Self::new(config, orders, users, gateway))
  }
}
