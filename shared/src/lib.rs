//! Shared types and models for the Gestion Commerciale platform
//!
//! This crate contains types shared between the backend and other
//! components of the system, along with the pure business rules used
//! by the alert derivation engine.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
