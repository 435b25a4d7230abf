/// PostgreSQL store
///
/// Implements the store traits with sqlx against the schema in
/// `migrations/`. Unique and check constraint failures are translated into
/// [`StoreError`] here, keyed by the constraint names the migrations
/// declare.
///
/// # Example
///
/// ```no_run
/// use staffdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use staffdesk_shared::store::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use super::{AccountStore, EmployeeStore, Store, StoreError, StoreResult};
use crate::models::{
    account::{Account, NewAccount},
    employee::{EmployeeChanges, EmployeeRecord, NewEmployee},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, created_at";

const EMPLOYEE_COLUMNS: &str = "id, owner_account_id, first_name, last_name, email, phone, \
     department, designation, date_of_joining, salary, address, status, created_at";

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a constraint name from the migrations to the field it guards
fn constraint_field(constraint: &str) -> String {
    match constraint {
        "accounts_email_key" | "employees_email_key" => "email".to_string(),
        other => other.to_string(),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let field = db_err
                        .constraint()
                        .map(constraint_field)
                        .unwrap_or_else(|| "unknown".to_string());
                    return StoreError::UniqueViolation { field };
                }

                if db_err.is_check_violation() {
                    let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                    return StoreError::CheckViolation(constraint);
                }

                StoreError::Backend(format!("Database error: {}", db_err))
            }
            other => StoreError::Backend(format!("Database error: {}", other)),
        }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let query = format!(
            "INSERT INTO accounts (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(account.name)
            .bind(account.email)
            .bind(account.password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<EmployeeRecord> {
        let query = format!(
            r#"
            INSERT INTO employees (owner_account_id, first_name, last_name, email, phone,
                                   department, designation, date_of_joining, salary, address, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        let record = sqlx::query_as::<_, EmployeeRecord>(&query)
            .bind(employee.owner_account_id)
            .bind(employee.first_name)
            .bind(employee.last_name)
            .bind(employee.email)
            .bind(employee.phone)
            .bind(employee.department)
            .bind(employee.designation)
            .bind(employee.date_of_joining)
            .bind(employee.salary)
            .bind(employee.address)
            .bind(employee.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn employee_email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_employees_by_owner(&self, owner: Uuid) -> StoreResult<Vec<EmployeeRecord>> {
        let query = format!(
            "SELECT {} FROM employees WHERE owner_account_id = $1 ORDER BY created_at DESC",
            EMPLOYEE_COLUMNS
        );

        let records = sqlx::query_as::<_, EmployeeRecord>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<EmployeeRecord>> {
        let query = format!(
            "SELECT {} FROM employees WHERE id = $1 AND owner_account_id = $2",
            EMPLOYEE_COLUMNS
        );

        let record = sqlx::query_as::<_, EmployeeRecord>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update_employee(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<EmployeeRecord>> {
        if changes.is_empty() {
            return self.find_employee(owner, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 2;
        let mut assign = |column: &str| {
            bind_count += 1;
            assignments.push(format!("{} = ${}", column, bind_count));
        };

        if changes.first_name.is_some() {
            assign("first_name");
        }
        if changes.last_name.is_some() {
            assign("last_name");
        }
        if changes.email.is_some() {
            assign("email");
        }
        if changes.phone.is_some() {
            assign("phone");
        }
        if changes.department.is_some() {
            assign("department");
        }
        if changes.designation.is_some() {
            assign("designation");
        }
        if changes.date_of_joining.is_some() {
            assign("date_of_joining");
        }
        if changes.salary.is_some() {
            assign("salary");
        }
        if changes.address.is_some() {
            assign("address");
        }
        if changes.status.is_some() {
            assign("status");
        }

        let query = format!(
            "UPDATE employees SET {} WHERE id = $1 AND owner_account_id = $2 RETURNING {}",
            assignments.join(", "),
            EMPLOYEE_COLUMNS
        );
        debug!(employee_id = %id, fields = assignments.len(), "Updating employee");

        // Bind in the same order the assignments were pushed
        let mut q = sqlx::query_as::<_, EmployeeRecord>(&query).bind(id).bind(owner);

        if let Some(v) = changes.first_name {
            q = q.bind(v);
        }
        if let Some(v) = changes.last_name {
            q = q.bind(v);
        }
        if let Some(v) = changes.email {
            q = q.bind(v);
        }
        if let Some(v) = changes.phone {
            q = q.bind(v);
        }
        if let Some(v) = changes.department {
            q = q.bind(v);
        }
        if let Some(v) = changes.designation {
            q = q.bind(v);
        }
        if let Some(v) = changes.date_of_joining {
            q = q.bind(v);
        }
        if let Some(v) = changes.salary {
            q = q.bind(v);
        }
        if let Some(v) = changes.address {
            q = q.bind(v);
        }
        if let Some(v) = changes.status {
            q = q.bind(v);
        }

        let record = q.fetch_optional(&self.pool).await?;

        Ok(record)
    }

    async fn delete_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND owner_account_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
