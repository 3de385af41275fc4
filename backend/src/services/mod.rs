//! Business logic services for the Gestion Commerciale backend

pub mod alert;
pub mod auth;
pub mod invoice;
pub mod product;
pub mod replenishment;

pub use alert::AlertService;
pub use auth::AuthService;
pub use invoice::InvoiceService;
pub use product::ProductService;
pub use replenishment::ReplenishmentService;
