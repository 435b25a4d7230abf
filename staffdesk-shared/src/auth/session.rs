/// Session resolution
///
/// Turns request headers into an authenticated account or a reason why not.
/// A session token is looked up in the `Authorization: Bearer` header first
/// and the session cookie second; whichever is found is validated with
/// [`validate_token`](super::jwt::validate_token).
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use chrono::Duration;
/// use staffdesk_shared::auth::session::{AuthMethod, SessionSettings};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionSettings::new(
///     "session-secret-at-least-32-bytes-long",
///     Duration::hours(24),
///     "staffdesk_session",
///     false,
/// );
///
/// let account_id = Uuid::new_v4();
/// let token = sessions.issue(account_id)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::COOKIE,
///     HeaderValue::from_str(&format!("staffdesk_session={}", token))?,
/// );
///
/// let auth = sessions.resolve(&headers)?;
/// assert_eq!(auth.account_id, account_id);
/// assert_eq!(auth.method, AuthMethod::Cookie);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{create_token, validate_token, Claims, JwtError};

/// Where the session token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// `Authorization: Bearer <token>`
    Bearer,

    /// Session cookie
    Cookie,
}

/// Authenticated identity attached to a request
///
/// Inserted into request extensions by the auth gate; handlers read it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub method: AuthMethod,
}

/// Reasons a request could not be resolved to an account
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Neither a bearer token nor a session cookie was sent
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not a bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("{0}")]
    InvalidToken(String),
}

/// Session signing and cookie settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    secret: String,
    ttl: Duration,
    cookie_name: String,
    secure: bool,
}

impl SessionSettings {
    /// Creates session settings
    ///
    /// `secure` marks the cookie `Secure` (HTTPS only).
    pub fn new(
        secret: impl Into<String>,
        ttl: Duration,
        cookie_name: impl Into<String>,
        secure: bool,
    ) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            cookie_name: cookie_name.into(),
            secure,
        }
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed session token for an account
    pub fn issue(&self, account_id: Uuid) -> Result<String, JwtError> {
        create_token(&Claims::new(account_id, self.ttl)?, &self.secret)
    }

    /// Finds the raw session token in the request headers
    ///
    /// A bearer header takes precedence over the cookie.
    pub fn extract_token(&self, headers: &HeaderMap) -> Result<(String, AuthMethod), AuthError> {
        if let Some(value) = headers.get(header::AUTHORIZATION) {
            let value = value
                .to_str()
                .map_err(|_| AuthError::InvalidFormat("Invalid Authorization header".to_string()))?;

            let token = value
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

            return Ok((token.to_string(), AuthMethod::Bearer));
        }

        CookieJar::from_headers(headers)
            .get(&self.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
            .map(|token| (token, AuthMethod::Cookie))
            .ok_or(AuthError::MissingCredentials)
    }

    /// Resolves the request to an authenticated account
    pub fn resolve(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let (token, method) = self.extract_token(headers)?;

        let claims = validate_token(&token, &self.secret).map_err(|e| match e {
            JwtError::Expired => AuthError::InvalidToken("Session expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            _ => AuthError::InvalidToken("Invalid session token".to_string()),
        })?;

        Ok(AuthContext {
            account_id: claims.sub,
            method,
        })
    }

    /// Builds the HttpOnly cookie carrying a session token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Builds a cookie that clears the session on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }
}
