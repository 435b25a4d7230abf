/// In-memory store
///
/// Keeps accounts and employee records in process memory behind a single
/// `RwLock`, so each trait method is atomic just like a single SQL
/// statement. Enforces the same uniqueness rules as the Postgres schema.
///
/// Used by the test suites and for running the API without a database.
///
/// # Example
///
/// ```
/// use staffdesk_shared::store::{memory::MemoryStore, EmployeeStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// assert!(store.list_employees_by_owner(Uuid::new_v4()).await?.is_empty());
/// # Ok(())
/// # }
/// ```

use super::{AccountStore, EmployeeStore, Store, StoreError, StoreResult};
use crate::models::{
    account::{Account, NewAccount},
    employee::{EmployeeChanges, EmployeeRecord, NewEmployee},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    /// Insertion order, oldest first
    employees: Vec<EmployeeRecord>,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of employee records across all owners
    pub async fn employee_count(&self) -> usize {
        self.state.read().await.employees.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut state = self.state.write().await;

        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            });
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<EmployeeRecord> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(&employee.owner_account_id) {
            return Err(StoreError::Backend(format!(
                "owner account {} does not exist",
                employee.owner_account_id
            )));
        }
        if state.employees.iter().any(|e| e.email == employee.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            });
        }
        if employee.salary < 0 {
            return Err(StoreError::CheckViolation("salary must be >= 0".to_string()));
        }

        let record = EmployeeRecord {
            id: Uuid::new_v4(),
            owner_account_id: employee.owner_account_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            phone: employee.phone,
            department: employee.department,
            designation: employee.designation,
            date_of_joining: employee.date_of_joining,
            salary: employee.salary,
            address: employee.address,
            status: employee.status,
            created_at: Utc::now(),
        };
        state.employees.push(record.clone());

        Ok(record)
    }

    async fn employee_email_exists(&self, email: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.employees.iter().any(|e| e.email == email))
    }

    async fn list_employees_by_owner(&self, owner: Uuid) -> StoreResult<Vec<EmployeeRecord>> {
        let state = self.state.read().await;

        // Newest insert first, then a stable sort keeps that order for equal timestamps
        let mut records: Vec<EmployeeRecord> = state
            .employees
            .iter()
            .rev()
            .filter(|e| e.owner_account_id == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn find_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<EmployeeRecord>> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .iter()
            .find(|e| e.id == id && e.owner_account_id == owner)
            .cloned())
    }

    async fn update_employee(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<EmployeeRecord>> {
        let mut state = self.state.write().await;

        let Some(index) = state
            .employees
            .iter()
            .position(|e| e.id == id && e.owner_account_id == owner)
        else {
            return Ok(None);
        };

        if let Some(ref email) = changes.email {
            let taken = state
                .employees
                .iter()
                .any(|e| e.id != id && &e.email == email);
            if taken {
                return Err(StoreError::UniqueViolation {
                    field: "email".to_string(),
                });
            }
        }
        if changes.salary.is_some_and(|s| s < 0) {
            return Err(StoreError::CheckViolation("salary must be >= 0".to_string()));
        }

        let record = &mut state.employees[index];
        changes.apply_to(record);

        Ok(Some(record.clone()))
    }

    async fn delete_employee(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.employees.len();
        state
            .employees
            .retain(|e| !(e.id == id && e.owner_account_id == owner));

        Ok(state.employees.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::EmployeeStatus;
    use chrono::NaiveDate;

    async fn seed_account(store: &MemoryStore, email: &str) -> Account {
        store
            .insert_account(NewAccount {
                name: "Owner".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn new_employee(owner: Uuid, email: &str) -> NewEmployee {
        NewEmployee {
            owner_account_id: owner,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: String::new(),
            department: "IT".to_string(),
            designation: String::new(),
            date_of_joining: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            salary: 5000,
            address: String::new(),
            status: EmployeeStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_duplicate_account_email_rejected() {
        let store = MemoryStore::new();
        seed_account(&store, "owner@example.com").await;

        let err = store
            .insert_account(NewAccount {
                name: "Other".to_string(),
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::UniqueViolation {
                field: "email".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_employee_email_unique_across_owners() {
        let store = MemoryStore::new();
        let a = seed_account(&store, "a@example.com").await;
        let b = seed_account(&store, "b@example.com").await;

        store.insert_employee(new_employee(a.id, "ada@x.com")).await.unwrap();
        let err = store
            .insert_employee(new_employee(b.id, "ada@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { .. }));
        assert_eq!(store.employee_count().await, 1);
    }

    #[tokio::test]
    async fn test_scoped_operations_ignore_other_owners() {
        let store = MemoryStore::new();
        let a = seed_account(&store, "a@example.com").await;
        let b = seed_account(&store, "b@example.com").await;

        let rec = store.insert_employee(new_employee(a.id, "ada@x.com")).await.unwrap();

        assert!(store.find_employee(b.id, rec.id).await.unwrap().is_none());
        assert!(store
            .update_employee(b.id, rec.id, EmployeeChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_employee(b.id, rec.id).await.unwrap());

        assert!(store.find_employee(a.id, rec.id).await.unwrap().is_some());
        assert!(store.delete_employee(a.id, rec.id).await.unwrap());
        assert!(!store.delete_employee(a.id, rec.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let a = seed_account(&store, "a@example.com").await;

        let first = store.insert_employee(new_employee(a.id, "one@x.com")).await.unwrap();
        let second = store.insert_employee(new_employee(a.id, "two@x.com")).await.unwrap();

        let listed = store.list_employees_by_owner(a.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let store = MemoryStore::new();
        let a = seed_account(&store, "a@example.com").await;

        store.insert_employee(new_employee(a.id, "one@x.com")).await.unwrap();
        let second = store.insert_employee(new_employee(a.id, "two@x.com")).await.unwrap();

        let err = store
            .update_employee(
                a.id,
                second.id,
                EmployeeChanges {
                    email: Some("one@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // Keeping its own email is not a conflict
        let same = store
            .update_employee(
                a.id,
                second.id,
                EmployeeChanges {
                    email: Some("two@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }
}
