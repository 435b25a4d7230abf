/// Dashboard summary
///
/// Served under `/dashboard` and any path below it. The page gate has
/// already redirected anonymous visitors to `/login` before this runs; a
/// session whose account no longer exists is sent there too.

use crate::{
    app::{AppState, LOGIN_PAGE},
    error::ApiResult,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Serialize;
use staffdesk_shared::{
    auth::session::AuthContext,
    models::{
        account::AccountProfile,
        employee::{EmployeeFilter, EmployeeStats},
    },
    service::ServiceError,
};
use tracing::debug;

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub account: AccountProfile,
    pub stats: EmployeeStats,
}

/// Signed-in account and its employee stats
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Response> {
    let account = match state.accounts.current(ctx.account_id).await {
        Ok(account) => account,
        Err(ServiceError::Unauthenticated) => {
            debug!(account_id = %ctx.account_id, "Session for missing account, redirecting");
            return Ok(Redirect::to(LOGIN_PAGE).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let listing = state
        .employees
        .list_for_owner(ctx.account_id, &EmployeeFilter::default())
        .await?;

    Ok(Json(DashboardResponse {
        account: account.profile(),
        stats: listing.stats,
    })
    .into_response())
}
