//! Employee record model
//!
//! Employee records are the directory entries managed by an account. Each
//! record is owned by exactly one account (the one that created it) and the
//! owner never changes.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE employee_status AS ENUM ('Active', 'Inactive');
//!
//! CREATE TABLE employees (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     owner_account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
//!     first_name VARCHAR(255) NOT NULL,
//!     last_name VARCHAR(255) NOT NULL DEFAULT '',
//!     email VARCHAR(320) NOT NULL UNIQUE,
//!     phone VARCHAR(64) NOT NULL DEFAULT '',
//!     department VARCHAR(255) NOT NULL DEFAULT 'IT',
//!     designation VARCHAR(255) NOT NULL DEFAULT '',
//!     date_of_joining DATE NOT NULL DEFAULT CURRENT_DATE,
//!     salary BIGINT NOT NULL DEFAULT 0 CHECK (salary >= 0),
//!     address TEXT NOT NULL DEFAULT '',
//!     status employee_status NOT NULL DEFAULT 'Active',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Records serialize with camelCase keys, which is the shape the HTTP API
//! returns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Department assigned when none is supplied
pub const DEFAULT_DEPARTMENT: &str = "IT";

/// Employment status
///
/// Stored as the Postgres enum `employee_status`. No other value is
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status")]
pub enum EmployeeStatus {
    /// Currently employed
    Active,

    /// No longer employed (record kept for reference)
    Inactive,
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

impl EmployeeStatus {
    /// Returns the status label as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
        }
    }

    /// Parses a status label
    ///
    /// Only the exact labels `Active` and `Inactive` are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(EmployeeStatus::Active),
            "Inactive" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    /// Unique record ID (UUID v4)
    pub id: Uuid,

    /// Account that created and owns this record
    pub owner_account_id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Work email, unique across every record regardless of owner
    pub email: String,

    pub phone: String,

    pub department: String,

    pub designation: String,

    /// Calendar date the employee joined (no time component)
    pub date_of_joining: NaiveDate,

    /// Monthly salary, never negative
    pub salary: i64,

    pub address: String,

    pub status: EmployeeStatus,

    /// When the record was created (immutable)
    pub created_at: DateTime<Utc>,
}

impl EmployeeRecord {
    /// Full display name ("first last"), trimmed when the last name is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A fully validated record ready to be inserted
///
/// Defaults have already been applied; the store only assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub owner_account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub designation: String,
    pub date_of_joining: NaiveDate,
    pub salary: i64,
    pub address: String,
    pub status: EmployeeStatus,
}

/// Validated partial update
///
/// Only `Some` fields are written. Ownership and creation time are not
/// part of the update surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub salary: Option<i64>,
    pub address: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeChanges {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        *self == EmployeeChanges::default()
    }

    /// Applies the changes to a record in place
    pub fn apply_to(&self, record: &mut EmployeeRecord) {
        if let Some(ref v) = self.first_name {
            record.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            record.last_name = v.clone();
        }
        if let Some(ref v) = self.email {
            record.email = v.clone();
        }
        if let Some(ref v) = self.phone {
            record.phone = v.clone();
        }
        if let Some(ref v) = self.department {
            record.department = v.clone();
        }
        if let Some(ref v) = self.designation {
            record.designation = v.clone();
        }
        if let Some(v) = self.date_of_joining {
            record.date_of_joining = v;
        }
        if let Some(v) = self.salary {
            record.salary = v;
        }
        if let Some(ref v) = self.address {
            record.address = v.clone();
        }
        if let Some(v) = self.status {
            record.status = v;
        }
    }
}

/// Aggregate counts over a set of records
///
/// Always derived, never stored. Because the status enum is closed,
/// `active + inactive == total` holds for any input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl EmployeeStats {
    /// Computes stats over the given records
    pub fn from_records(records: &[EmployeeRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.status {
                EmployeeStatus::Active => stats.active += 1,
                EmployeeStatus::Inactive => stats.inactive += 1,
            }
            stats
        })
    }
}

/// Listing filter used by the dashboard search box and status tabs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring matched against "first last"
    pub search: Option<String>,

    /// Restricts to one status; `None` means all
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFilter {
    /// Returns true if the record passes the filter
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        let matches_status = self.status.map_or(true, |s| record.status == s);

        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => record
                .full_name()
                .to_lowercase()
                .contains(&term.to_lowercase()),
        };

        matches_status && matches_search
    }
}
