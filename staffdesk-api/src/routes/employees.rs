/// Employee endpoints
///
/// Every handler runs behind the session gate and acts only on records owned
/// by the caller. Another account's record is indistinguishable from a
/// missing one (404).
///
/// # Endpoints
///
/// - `GET /api/employees?search=&status=` - List with stats
/// - `POST /api/employees` - Create
/// - `GET /api/employees/:id` - Fetch one
/// - `PATCH /api/employees/:id` - Partial update
/// - `DELETE /api/employees/:id` - Delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::MessageResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use staffdesk_shared::{
    auth::session::AuthContext,
    models::employee::EmployeeRecord,
    service::employees::{
        CreateEmployeeInput, EmployeeListing, ListEmployeesQuery, UpdateEmployeeInput,
    },
};
use uuid::Uuid;

/// List the caller's employees
///
/// `search` matches "first last" case-insensitively; `status` is `Active`,
/// `Inactive` or `All`. Stats always cover every record the caller owns.
///
/// # Response
///
/// ```json
/// {
///   "employees": [{ "id": "uuid", "firstName": "Ada", "status": "Active", ... }],
///   "stats": { "total": 1, "active": 1, "inactive": 0 }
/// }
/// ```
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    WithRejection(Query(query), _): WithRejection<Query<ListEmployeesQuery>, ApiError>,
) -> ApiResult<Json<EmployeeListing>> {
    let filter = query.into_filter()?;
    let listing = state.employees.list_for_owner(ctx.account_id, &filter).await?;

    Ok(Json(listing))
}

/// Create an employee owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/employees
/// Content-Type: application/json
///
/// { "firstName": "Ada", "email": "ada@example.com", "salary": 5000 }
/// ```
///
/// Department defaults to `IT`, status to `Active` and the joining date to
/// today.
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, or the email belongs to any record
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    WithRejection(Json(input), _): WithRejection<Json<CreateEmployeeInput>, ApiError>,
) -> ApiResult<(StatusCode, Json<EmployeeRecord>)> {
    let record = state.employees.create(ctx.account_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one of the caller's employees
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<EmployeeRecord>> {
    let record = state.employees.get(ctx.account_id, id).await?;
    Ok(Json(record))
}

/// Apply a partial update
///
/// Unknown keys and attempts to change `id`, owner or `createdAt` are
/// ignored. An empty update returns the record unchanged.
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateEmployeeInput>, ApiError>,
) -> ApiResult<Json<EmployeeRecord>> {
    let record = state.employees.update(ctx.account_id, id, input).await?;
    Ok(Json(record))
}

/// Delete one of the caller's employees
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    state.employees.delete(ctx.account_id, id).await?;

    Ok(Json(MessageResponse {
        message: "Employee deleted".to_string(),
    }))
}
