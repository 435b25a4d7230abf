//! Account model
//!
//! Accounts are the registered users of StaffDesk. An account owns the
//! employee records it creates.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     email VARCHAR(320) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account model representing a registered user
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash is
/// skipped on serialization so an `Account` can never leak it into a
/// response body.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, stored trimmed and lower-cased
    ///
    /// Must be unique across all accounts
    pub email: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Public view of the account, safe to return to clients
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            account_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Input for creating a new account
///
/// All fields are already validated and the email normalized.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,

    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Client-facing account summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Normalizes an email for account storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_profile() {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };

        let profile = account.profile();
        assert_eq!(profile.account_id, account.id);

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["accountId"], account.id.to_string());
        assert_eq!(value["email"], "test@example.com");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
