//! # StaffDesk Shared Library
//!
//! Domain types, persistence and business logic behind the StaffDesk API.
//!
//! ## Module Organization
//!
//! - `models`: Accounts and employee records
//! - `store`: Store traits with PostgreSQL and in-memory backends
//! - `service`: Validation, ownership scoping and account flows
//! - `auth`: Password hashing, session tokens and session resolution
//! - `db`: Connection pool and embedded migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the StaffDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
