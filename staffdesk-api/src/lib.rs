//! # StaffDesk API Server Library
//!
//! HTTP layer of the employee directory: account registration and login,
//! owner-scoped employee CRUD with stats, and the gated dashboard.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and session gates
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
