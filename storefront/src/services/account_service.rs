// storefront/src/services/account_service.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{AuthenticatedUser, UserProfile};
use crate::pipelines::contexts::{LoginInput, RegisterInput, SigninCtxData, SignupCtxData};
use crate::state::AppState;
use flow::{ContextData, PipelineResult};
use tracing::{info, instrument};

/// Creates the account and issues its first token.
#[instrument(name = "account_service::register", skip(state, input), fields(email = %input.email), err(Display))]
pub async fn register(state: &AppState, input: RegisterInput) -> AppResult<AuthenticatedUser> {
  let ctx = ContextData::new(SignupCtxData {
    app_state: state.clone(),
    input,
    user: None,
    token: None,
  });

  match state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let (user, token) = ctx.with(|data| (data.user.clone(), data.token.clone()));
      match (user, token) {
        (Some(user), Some(token)) => {
          info!(user_id = %user.id, "Signup successful.");
          Ok(AuthenticatedUser {
            profile: UserProfile::from(&user),
            token,
          })
        }
        _ => Err(AppError::Internal("Signup completed without a user or token.".to_string())),
      }
    }
    PipelineResult::Stopped => Err(AppError::Internal("Signup process was halted by an internal step.".to_string())),
  }
}

#[instrument(name = "account_service::login", skip(state, input), fields(email = %input.email), err(Display))]
pub async fn login(state: &AppState, input: LoginInput) -> AppResult<AuthenticatedUser> {
  let ctx = ContextData::new(SigninCtxData {
    app_state: state.clone(),
    input,
    user: None,
    token: None,
  });

  match state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let (user, token) = ctx.with(|data| (data.user.clone(), data.token.clone()));
      match (user, token) {
        (Some(user), Some(token)) => Ok(AuthenticatedUser {
          profile: UserProfile::from(&user),
          token,
        }),
        _ => Err(AppError::Auth("Signin completed without session token generation.".to_string())),
      }
    }
    PipelineResult::Stopped => Err(AppError::Auth("Authentication process was unexpectedly halted.".to_string())),
  }
}
