/// Account service
///
/// Registration, credential checks and session lookups. Passwords are
/// hashed and verified on the blocking thread pool, and neither the
/// plaintext nor the hash is ever logged.

use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::error::{FieldError, ServiceError, ServiceResult};
use crate::auth::password::{self, PasswordError};
use crate::models::account::{normalize_email, Account, NewAccount};
use crate::store::{AccountStore, StoreError};

const EMAIL_TAKEN: &str = "This email is already registered.";

/// Registration request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Converts `validator` errors into field errors, ordered by field name
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                FieldError::new(
                    field.to_string(),
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                )
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

fn password_failure(err: PasswordError) -> ServiceError {
    error!(error = %err, "Password hashing failed");
    ServiceError::Internal("password processing failed".to_string())
}

/// Hash checked against when the email is unknown, so both login failures
/// cost one Argon2id verification
fn dummy_hash() -> Result<&'static str, PasswordError> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = password::hash_password("staffdesk-unregistered-account")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// Verifies `plaintext` on the blocking pool
///
/// With no stored hash the dummy hash is verified instead and the result is
/// always `false`.
async fn verify_credentials(plaintext: String, stored: Option<String>) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || match stored {
        Some(hash) => password::verify_password(&plaintext, &hash),
        None => password::verify_password(&plaintext, dummy_hash()?).map(|_| false),
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("verification task failed: {}", e)))?
    .map_err(password_failure)
}

/// Account operations
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Registers a new account
    ///
    /// The name is trimmed and the email normalized before validation.
    #[instrument(skip(self, input), fields(email = %normalize_email(&input.email)))]
    pub async fn register(&self, input: RegisterInput) -> ServiceResult<Account> {
        let input = RegisterInput {
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password: input.password,
        };

        let mut errors = match input.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };
        if input.password.is_empty() {
            errors.retain(|e| e.field != "password");
            errors.push(FieldError::missing("password"));
        } else if let Err(msg) = password::validate_password_strength(&input.password) {
            if !errors.iter().any(|e| e.field == "password") {
                errors.push(FieldError::new("password", msg));
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        if self.store.find_account_by_email(&input.email).await?.is_some() {
            warn!("Registration rejected: email already registered");
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let plaintext = input.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
            .await
            .map_err(|e| ServiceError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(password_failure)?;

        let account = self
            .store
            .insert_account(NewAccount {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { .. } => ServiceError::Conflict(EMAIL_TAKEN.to_string()),
                other => other.into(),
            })?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Checks credentials and returns the account on success
    ///
    /// Unknown emails and wrong passwords fail with the same
    /// [`ServiceError::InvalidCredentials`], and both run one password
    /// verification.
    #[instrument(skip(self, input), fields(email = %normalize_email(&input.email)))]
    pub async fn login(&self, input: LoginInput) -> ServiceResult<Account> {
        let input = LoginInput {
            email: normalize_email(&input.email),
            password: input.password,
        };
        input
            .validate()
            .map_err(|e| ServiceError::Validation(field_errors(&e)))?;

        let Some(account) = self.store.find_account_by_email(&input.email).await? else {
            verify_credentials(input.password, None).await?;
            debug!("Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        let matches =
            verify_credentials(input.password, Some(account.password_hash.clone())).await?;

        if !matches {
            debug!(account_id = %account.id, "Login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(account_id = %account.id, "Login succeeded");
        Ok(account)
    }

    /// Loads the account behind a session
    ///
    /// A session for an account that no longer exists is treated as no
    /// session at all.
    #[instrument(skip(self))]
    pub async fn current(&self, account_id: Uuid) -> ServiceResult<Account> {
        self.store
            .find_account_by_id(account_id)
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryStore::new()))
    }

    fn register_input(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let accounts = service();

        let account = accounts
            .register(register_input("  Ada  ", " Ada@Example.com ", "correct horse"))
            .await
            .unwrap();

        assert_eq!(account.name, "Ada");
        assert_eq!(account.email, "ada@example.com");
        assert!(account.password_hash.starts_with("$argon2id$"));
        assert_ne!(account.password_hash, "correct horse");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let err = service()
            .register(register_input("", "not-an-email", ""))
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let err = service()
            .register(register_input("Ada", "ada@example.com", "short"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Validation(vec![FieldError::new(
                "password",
                "Password must be at least 8 characters"
            )])
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let accounts = service();
        accounts
            .register(register_input("Ada", "ada@example.com", "password-one"))
            .await
            .unwrap();

        let err = accounts
            .register(register_input("Other", "ADA@example.com", "password-two"))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }

    #[tokio::test]
    async fn test_login() {
        let accounts = service();
        let registered = accounts
            .register(register_input("Ada", "ada@example.com", "password-one"))
            .await
            .unwrap();

        let account = accounts
            .login(LoginInput {
                email: "ADA@example.com".to_string(),
                password: "password-one".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(account.id, registered.id);

        let wrong_password = accounts
            .login(LoginInput {
                email: "ada@example.com".to_string(),
                password: "password-two".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = accounts
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "password-one".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password, ServiceError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_email);
    }

    #[test]
    fn test_dummy_hash_is_stable_argon2id() {
        let first = dummy_hash().unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_eq!(first, dummy_hash().unwrap());
    }

    #[tokio::test]
    async fn test_verify_credentials_without_account() {
        // Even the dummy password itself never matches
        assert!(!verify_credentials("staffdesk-unregistered-account".to_string(), None)
            .await
            .unwrap());
        assert!(!verify_credentials("anything".to_string(), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_failures_cost_the_same_work() {
        let accounts = service();
        accounts
            .register(register_input("Ada", "ada@example.com", "password-one"))
            .await
            .unwrap();
        // Warm the dummy hash so the timed call only verifies
        dummy_hash().unwrap();

        let start = std::time::Instant::now();
        accounts
            .login(LoginInput {
                email: "ada@example.com".to_string(),
                password: "password-two".to_string(),
            })
            .await
            .unwrap_err();
        let known = start.elapsed();

        let start = std::time::Instant::now();
        accounts
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "password-two".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = start.elapsed();

        assert!(
            unknown * 10 >= known,
            "unknown email took {:?}, known email took {:?}",
            unknown,
            known
        );
    }

    #[tokio::test]
    async fn test_current_unknown_account() {
        assert_eq!(
            service().current(Uuid::new_v4()).await.unwrap_err(),
            ServiceError::Unauthenticated
        );
    }
}
