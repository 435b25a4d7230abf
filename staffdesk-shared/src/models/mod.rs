/// Domain models for StaffDesk
///
/// # Models
///
/// - `account`: Registered users and their credentials
/// - `employee`: Employee records, status, stats and listing filters
///
/// Persistence lives in the `store` module; these types are plain data
/// shared by every store backend.

pub mod account;
pub mod employee;
