/// Account endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Create an account
/// - `POST /api/login` - Check credentials, set the session cookie
/// - `POST /api/logout` - Clear the session cookie
/// - `GET /api/session` - Current account (authenticated)
///
/// Login returns the session token both as an HttpOnly cookie (for the
/// browser) and in the body (for `Authorization: Bearer` clients).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde::{Deserialize, Serialize};
use staffdesk_shared::{
    auth::session::AuthContext,
    models::account::AccountProfile,
    service::accounts::{LoginInput, RegisterInput},
};
use uuid::Uuid;

/// Register response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub account_id: Uuid,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,

    /// Session token, also set as the session cookie
    pub access_token: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// { "name": "Ada Lovelace", "email": "ada@example.com", "password": "correct horse" }
/// ```
///
/// # Response (201)
///
/// ```json
/// { "message": "User created successfully!", "accountId": "uuid" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid fields, or email already registered
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<RegisterInput>, ApiError>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let account = state.accounts.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully!".to_string(),
            account_id: account.id,
        }),
    ))
}

/// Log in with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "password": "correct horse" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or email
/// - `401 Unauthorized`: Unknown email or wrong password (same response)
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, ApiError>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let account = state.accounts.login(input).await?;
    let token = state.sessions.issue(account.id)?;

    let jar = jar.add(state.sessions.session_cookie(token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            account_id: account.id,
            name: account.name,
            email: account.email,
            access_token: token,
        }),
    ))
}

/// Clear the session cookie
///
/// Always succeeds, with or without a session. Bearer tokens stay valid
/// until they expire.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(state.sessions.removal_cookie()),
        Json(MessageResponse {
            message: "Signed out".to_string(),
        }),
    )
}

/// Current account
///
/// A valid token for an account that no longer exists is a 401.
pub async fn session(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<AccountProfile>> {
    let account = state.accounts.current(ctx.account_id).await?;
    Ok(Json(account.profile()))
}
