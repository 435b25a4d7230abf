/// Employee service
///
/// Validates employee input and scopes every operation to the calling
/// account. A record owned by another account is reported exactly like a
/// missing one, so callers can never learn that it exists.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use staffdesk_shared::service::employees::{CreateEmployeeInput, EmployeeService};
/// use staffdesk_shared::store::{memory::MemoryStore, AccountStore};
/// use staffdesk_shared::models::account::NewAccount;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let owner = store
///     .insert_account(NewAccount {
///         name: "Owner".into(),
///         email: "owner@example.com".into(),
///         password_hash: "hash".into(),
///     })
///     .await?;
///
/// let employees = EmployeeService::new(store);
/// let input: CreateEmployeeInput =
///     serde_json::from_value(json!({"firstName": "Ada", "email": "ada@x.com", "salary": 5000}))?;
///
/// let record = employees.create(owner.id, input).await?;
/// assert_eq!(record.department, "IT");
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::{FieldError, ServiceError, ServiceResult};
use super::input::{coerce_salary, loose_text, non_blank, parse_date};
use crate::models::employee::{
    EmployeeChanges, EmployeeFilter, EmployeeRecord, EmployeeStats, EmployeeStatus, NewEmployee,
    DEFAULT_DEPARTMENT,
};
use crate::store::{EmployeeStore, StoreError};

/// Body of a create request
///
/// Fields are optional at the type level so that missing values can be
/// reported together as validation errors instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeInput {
    #[serde(default, deserialize_with = "loose_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub date_of_joining: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub salary: Option<Value>,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub status: Option<String>,
}

/// Body of an update request
///
/// Absent and `null` fields are left unchanged. Keys that are not listed
/// here (a round-tripped `id`, `createdAt` or `ownerAccountId`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<String>,
    #[serde(default)]
    pub salary: Option<Value>,
    pub address: Option<String>,
    pub status: Option<String>,
}

/// Query parameters of a list request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEmployeesQuery {
    pub search: Option<String>,
    /// `Active`, `Inactive` or `All`
    pub status: Option<String>,
}

impl ListEmployeesQuery {
    /// Converts the raw query into a listing filter
    pub fn into_filter(self) -> ServiceResult<EmployeeFilter> {
        let status = match non_blank(self.status.as_deref()) {
            None | Some("All") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        Ok(EmployeeFilter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            status,
        })
    }
}

/// An owner's records and the stats over all of them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeListing {
    pub employees: Vec<EmployeeRecord>,
    pub stats: EmployeeStats,
}

fn parse_status(raw: &str) -> ServiceResult<EmployeeStatus> {
    EmployeeStatus::parse(raw.trim())
        .ok_or_else(|| ServiceError::field("status", "status must be Active or Inactive"))
}

fn invalid_email() -> FieldError {
    FieldError::new("email", "email must be a valid email address")
}

fn conflict(email: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "Email {} is already registered to another employee",
        email
    ))
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Employee {} not found", id))
}

/// Replaces the generic store conflict with one that names the email
fn map_store_error(err: StoreError, email: Option<&str>) -> ServiceError {
    match (err, email) {
        (StoreError::UniqueViolation { field }, Some(email)) if field == "email" => conflict(email),
        (err, _) => err.into(),
    }
}

impl CreateEmployeeInput {
    /// Validates the input and applies defaults
    ///
    /// Every problem is collected, so a single error names all missing or
    /// malformed fields.
    pub fn into_new_employee(self, owner: Uuid) -> ServiceResult<NewEmployee> {
        let mut errors = Vec::new();

        let first_name = non_blank(self.first_name.as_deref()).map(str::to_string);
        if first_name.is_none() {
            errors.push(FieldError::missing("firstName"));
        }

        let email = non_blank(self.email.as_deref()).map(str::to_string);
        match email {
            None => errors.push(FieldError::missing("email")),
            Some(ref email) if !email.validate_email() => errors.push(invalid_email()),
            Some(_) => {}
        }

        let salary = self.salary.as_ref().and_then(coerce_salary);
        match salary {
            None => errors.push(FieldError::missing("salary")),
            Some(s) if s < 0 => {
                errors.push(FieldError::new("salary", "salary must not be negative"))
            }
            Some(_) => {}
        }

        let date_of_joining = match non_blank(self.date_of_joining.as_deref()) {
            None => Some(Utc::now().date_naive()),
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "dateOfJoining",
                        "dateOfJoining must be a date (YYYY-MM-DD)",
                    ));
                }
                parsed
            }
        };

        let status = match non_blank(self.status.as_deref()) {
            None => Some(EmployeeStatus::default()),
            Some(raw) => {
                let parsed = EmployeeStatus::parse(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new("status", "status must be Active or Inactive"));
                }
                parsed
            }
        };

        match (first_name, email, salary, date_of_joining, status) {
            (Some(first_name), Some(email), Some(salary), Some(date_of_joining), Some(status))
                if errors.is_empty() =>
            {
                Ok(NewEmployee {
                    owner_account_id: owner,
                    first_name,
                    last_name: self.last_name.unwrap_or_default(),
                    email,
                    phone: self.phone.unwrap_or_default(),
                    department: non_blank(self.department.as_deref())
                        .unwrap_or(DEFAULT_DEPARTMENT)
                        .to_string(),
                    designation: self.designation.unwrap_or_default(),
                    date_of_joining,
                    salary,
                    address: self.address.unwrap_or_default(),
                    status,
                })
            }
            _ => Err(ServiceError::Validation(errors)),
        }
    }
}

impl UpdateEmployeeInput {
    /// Validates the supplied fields into a set of changes
    pub fn into_changes(self) -> ServiceResult<EmployeeChanges> {
        let mut errors = Vec::new();

        let first_name = match self.first_name {
            Some(v) if v.trim().is_empty() => {
                errors.push(FieldError::new("firstName", "firstName cannot be empty"));
                None
            }
            other => other.map(|v| v.trim().to_string()),
        };

        let email = match self.email.as_deref().map(str::trim) {
            None => None,
            Some("") => {
                errors.push(FieldError::new("email", "email cannot be empty"));
                None
            }
            Some(v) if !v.validate_email() => {
                errors.push(invalid_email());
                None
            }
            Some(v) => Some(v.to_string()),
        };

        // A falsy salary leaves the stored value alone
        let salary = match self.salary.as_ref().and_then(coerce_salary) {
            Some(s) if s < 0 => {
                errors.push(FieldError::new("salary", "salary must not be negative"));
                None
            }
            other => other,
        };

        let date_of_joining = match non_blank(self.date_of_joining.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "dateOfJoining",
                        "dateOfJoining must be a date (YYYY-MM-DD)",
                    ));
                }
                parsed
            }
        };

        let status = match non_blank(self.status.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = EmployeeStatus::parse(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new("status", "status must be Active or Inactive"));
                }
                parsed
            }
        };

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        Ok(EmployeeChanges {
            first_name,
            last_name: self.last_name,
            email,
            phone: self.phone,
            // Blank keeps the stored department, as create falls back to the default
            department: non_blank(self.department.as_deref()).map(str::to_string),
            designation: self.designation,
            date_of_joining,
            salary,
            address: self.address,
            status,
        })
    }
}

/// Employee operations for authenticated accounts
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    /// Creates a service over the given store
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Lists the owner's records, newest first, with stats over all of them
    ///
    /// The filter narrows `employees` only; `stats` always cover the owner's
    /// full set.
    #[instrument(skip(self, filter))]
    pub async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &EmployeeFilter,
    ) -> ServiceResult<EmployeeListing> {
        let records = self.store.list_employees_by_owner(owner).await?;
        let stats = EmployeeStats::from_records(&records);

        let employees: Vec<EmployeeRecord> =
            records.into_iter().filter(|r| filter.matches(r)).collect();

        debug!(
            total = stats.total,
            returned = employees.len(),
            "Listed employees"
        );

        Ok(EmployeeListing { employees, stats })
    }

    /// Fetches one of the owner's records
    #[instrument(skip(self))]
    pub async fn get(&self, owner: Uuid, id: Uuid) -> ServiceResult<EmployeeRecord> {
        self.store
            .find_employee(owner, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Validates and stores a new record owned by `owner`
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        owner: Uuid,
        input: CreateEmployeeInput,
    ) -> ServiceResult<EmployeeRecord> {
        let new_employee = input.into_new_employee(owner)?;

        if self.store.employee_email_exists(&new_employee.email).await? {
            warn!(email = %new_employee.email, "Employee email already registered");
            return Err(conflict(&new_employee.email));
        }

        // The unique constraint still decides if a concurrent insert wins
        let email = new_employee.email.clone();
        let record = self
            .store
            .insert_employee(new_employee)
            .await
            .map_err(|e| map_store_error(e, Some(&email)))?;

        info!(employee_id = %record.id, "Employee created");
        Ok(record)
    }

    /// Applies a partial update to one of the owner's records
    ///
    /// An update with no effective fields returns the record unchanged.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> ServiceResult<EmployeeRecord> {
        let changes = input.into_changes()?;

        if let Some(ref email) = changes.email {
            let current = self.get(owner, id).await?;
            if *email != current.email && self.store.employee_email_exists(email).await? {
                warn!(%email, "Employee email already registered");
                return Err(conflict(email));
            }
        }

        let email = changes.email.clone();
        let record = self
            .store
            .update_employee(owner, id, changes)
            .await
            .map_err(|e| map_store_error(e, email.as_deref()))?
            .ok_or_else(|| not_found(id))?;

        info!(employee_id = %id, "Employee updated");
        Ok(record)
    }

    /// Permanently deletes one of the owner's records
    #[instrument(skip(self))]
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_employee(owner, id).await? {
            debug!(employee_id = %id, "Delete target not found");
            return Err(not_found(id));
        }

        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }
}
