// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use flow::FlowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// Signature or reference mismatch on a payment confirmation. The order is
  /// left untouched and the client may retry.
  #[error("Payment Verification Failed: {0}")]
  Verification(String),

  /// Remote gateway failure. The message must never carry the key secret.
  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Flow Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
  fn from(errors: validator::ValidationErrors) -> Self {
    AppError::Validation(first_validation_message(&errors))
  }
}

/// Picks one message out of a validator report, field names sorted so the
/// same bad payload always yields the same error.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
  let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
  fields.sort_by(|a, b| a.0.cmp(&b.0));
  fields
    .into_iter()
    .find_map(|(field, field_errors)| {
      field_errors.first().map(|e| match &e.message {
        Some(message) => message.to_string(),
        None => format!("{} is invalid", field),
      })
    })
    .unwrap_or_else(|| "Invalid request body".to_string())
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Verification(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Gateway(_)
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    let body = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => json!({ "error": m }),
      AppError::Verification(m) => json!({ "success": false, "error": m }),
      AppError::Gateway(m) => json!({ "error": "Payment gateway error", "detail": m }),
      AppError::Config(_) => json!({ "error": "Configuration issue" }),
      AppError::Sqlx(_) => json!({ "error": "Database operation failed" }),
      AppError::Workflow { .. } => json!({ "error": "Workflow processing error" }),
      AppError::Internal(_) => json!({ "error": "An internal error occurred" }),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
