// storefront/src/client/mod.rs

//! Checkout client: the wizard a shopper walks through, client-side pricing,
//! a typed HTTP client for the order API and the two-phase payment protocol.

pub mod api;
pub mod checkout;
pub mod pricing;
pub mod wizard;

pub use api::{ClientError, StorefrontApi};
pub use checkout::{
  CheckoutClient, CheckoutError, CheckoutOutcome, Initiated, PaymentPrompt, PendingPayment, PendingReason,
  PromptOutcome,
};
pub use pricing::PriceSummary;
pub use wizard::{CheckoutWizard, WizardError, WizardStep};
