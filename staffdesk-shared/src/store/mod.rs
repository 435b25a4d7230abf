/// Persistence layer for accounts and employee records
///
/// Services talk to storage only through the traits defined here. Each
/// trait method maps to one atomic operation against the backend, and every
/// backend translates its own constraint failures into [`StoreError`], so no
/// driver-specific error shape leaks past this module.
///
/// # Backends
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: in-process maps (tests and local runs)
///
/// # Example
///
/// ```no_run
/// use staffdesk_shared::store::{postgres::PgStore, EmployeeStore};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgStore::new(pool);
/// let records = store.list_employees_by_owner(owner).await?;
/// println!("{} employees", records.len());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use crate::models::{
    account::{Account, NewAccount},
    employee::{EmployeeChanges, EmployeeRecord, NewEmployee},
};
use async_trait::async_trait;
use uuid::Uuid;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated on {field}")]
    UniqueViolation {
        /// Logical field the constraint guards (e.g. "email")
        field: String,
    },

    /// A check constraint rejected the write
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    /// Connection, protocol or other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the email is taken.
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account>;

    /// Finds an account by its normalized email
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Finds an account by ID
    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;
}

/// Employee record persistence
///
/// Every read and write that targets a single record is scoped by owner:
/// a record owned by another account behaves exactly like a missing one.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Inserts a record, assigning its ID and creation time
    ///
    /// Fails with [`StoreError::UniqueViolation`] if any record already
    /// uses the email.
    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<EmployeeRecord>;

    /// Returns true if any record (of any owner) uses the email
    async fn employee_email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Lists an owner's records, most recently created first
    async fn list_employees_by_owner(&self, owner: Uuid) -> StoreResult<Vec<EmployeeRecord>>;

    /// Finds one of the owner's records
    async fn find_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<EmployeeRecord>>;

    /// Applies changes to one of the owner's records
    ///
    /// Returns `None` if the record does not exist or belongs to someone else.
    async fn update_employee(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<EmployeeRecord>>;

    /// Permanently deletes one of the owner's records
    ///
    /// Returns true if a record was deleted.
    async fn delete_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// A complete backend: accounts, employees and a liveness probe
#[async_trait]
pub trait Store: AccountStore + EmployeeStore {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
