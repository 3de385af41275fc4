//! HTTP handlers for the Gestion Commerciale API

pub mod alert;
pub mod auth;
pub mod health;
pub mod invoice;
pub mod product;
pub mod replenishment;

pub use alert::*;
pub use auth::*;
pub use health::*;
pub use invoice::*;
pub use product::*;
pub use replenishment::*;
