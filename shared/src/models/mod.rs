//! Domain models for the Gestion Commerciale platform

mod alert;
mod invoice;
mod product;
mod replenishment;
mod user;

pub use alert::*;
pub use invoice::*;
pub use product::*;
pub use replenishment::*;
pub use user::*;
