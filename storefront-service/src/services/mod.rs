//! Services layer for storefront-service.
//!
//! Business logic for accounts, pricing, orders, the catalog and suppliers.
//! Services talk to storage through the [`Store`](crate::store::Store) trait
//! and to the outside world through [`Notifier`].

pub mod access;
mod account;
mod catalog;
pub mod error;
mod jwt;
pub mod notifier;
mod order;
mod pricing;
mod reset_token;
mod supplier;

pub use access::{identify, identity_from_claims, Identity};
pub use account::AccountService;
pub use catalog::CatalogService;
pub use error::ServiceError;
pub use jwt::{Claims, JwtService};
pub use notifier::{MockNotifier, Notifier, SmtpNotifier};
pub use order::OrderService;
pub use pricing::{PricedLine, PricingEngine};
pub use reset_token::ResetTokenService;
pub use supplier::SupplierService;
