/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout and session lookup
/// - `employees`: Owner-scoped employee CRUD with stats
/// - `dashboard`: Gated dashboard summary

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
