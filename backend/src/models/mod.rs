//! Database models for the Gestion Commerciale backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
