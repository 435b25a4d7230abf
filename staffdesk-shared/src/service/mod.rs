/// Business logic for StaffDesk
///
/// Services sit between the HTTP layer and the store. They own input
/// validation, defaulting, ownership scoping and the translation of store
/// failures into [`ServiceError`].
///
/// # Services
///
/// - [`accounts::AccountService`]: registration, login and session lookup
/// - [`employees::EmployeeService`]: per-owner employee CRUD and stats
///
/// # Example
///
/// ```
/// use staffdesk_shared::service::employees::EmployeeService;
/// use staffdesk_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let employees = EmployeeService::new(Arc::new(MemoryStore::new()));
/// let listing = employees.list_for_owner(Uuid::new_v4(), &Default::default()).await?;
/// assert_eq!(listing.stats.total, 0);
/// # Ok(())
/// # }
/// ```

pub mod accounts;
pub mod employees;
pub mod error;
pub mod input;

pub use error::{FieldError, ServiceError, ServiceResult};
