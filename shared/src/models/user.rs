//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Language;

/// A user account on the platform
///
/// Every core entity (products, replenishments, invoices, alerts) is
/// owned by exactly one user; all queries are scoped by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
    /// French business registry number (14 digits)
    pub siret: Option<String>,
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
