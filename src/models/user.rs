//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role assigned at first sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    #[sqlx(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PARTICIPANT")]
    #[sqlx(rename = "PARTICIPANT")]
    Participant,
}

/// User account, created on first OAuth sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Internal user ID (UUID)
    pub id: String,
    /// Email address (unique, from the OAuth provider)
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Profile picture URL
    pub image: Option<String>,
    /// Access role
    pub role: Role,
    /// Whether the email belongs to the member institution domain
    pub is_member: bool,
    /// When the user first signed in
    pub created_at: DateTime<Utc>,
    /// Updated on subsequent logins
    pub updated_at: DateTime<Utc>,
}
