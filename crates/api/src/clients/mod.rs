//! Clients for external collaborators.
//!
//! Both the identity provider and payment gateway are trait objects so
//! handlers and the provisioning saga stay testable without the network.

pub mod identity;
pub mod payment;

pub use identity::{HttpIdentityProvider, IdentityError, IdentityProvider, NewIdentity};
pub use payment::{
    CheckoutMetadata, CheckoutSession, CheckoutSessionRequest, HttpPaymentGateway, PaymentError,
    PaymentGateway,
};
