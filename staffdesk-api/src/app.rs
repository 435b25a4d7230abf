/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use staffdesk_api::{app::AppState, config::Config};
/// use staffdesk_shared::{db::pool::{create_pool, DatabaseConfig}, store::postgres::PgStore};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = staffdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use staffdesk_shared::{
    auth::session::SessionSettings,
    service::{accounts::AccountService, employees::EmployeeService},
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Where anonymous visitors of a dashboard page are sent
pub const LOGIN_PAGE: &str = "/login";

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The store
/// is constructed once at startup and shared by both services.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, used directly only for health checks
    pub store: Arc<dyn Store>,

    /// Registration, login and session lookups
    pub accounts: AccountService,

    /// Owner-scoped employee operations
    pub employees: EmployeeService,

    /// Session token and cookie settings
    pub sessions: SessionSettings,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state over the given store
    pub fn new<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        let sessions = SessionSettings::new(
            config.session.secret.clone(),
            chrono::Duration::hours(config.session.ttl_hours),
            config.session.cookie_name.clone(),
            config.api.production,
        );

        Self {
            accounts: AccountService::new(store.clone()),
            employees: EmployeeService::new(store.clone()),
            store,
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                  # Health check (public)
/// ├── /api/
/// │   ├── POST /register            # public
/// │   ├── POST /login               # public, sets the session cookie
/// │   ├── POST /logout              # public, clears the session cookie
/// │   ├── GET  /session             # authenticated
/// │   └── /employees                # authenticated
/// │       ├── GET    /              # list + stats
/// │       ├── POST   /              # create
/// │       ├── GET    /:id
/// │       ├── PATCH  /:id
/// │       └── DELETE /:id
/// └── GET /dashboard, /dashboard/*  # page gate, redirects to /login
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Response compression (gzip, brotli)
/// 4. Logging (tower-http TraceLayer)
/// 5. Session gate (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_api = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let protected_api = Router::new()
        .route("/session", get(routes::auth::session))
        .route(
            "/employees",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        .route(
            "/employees/:id",
            get(routes::employees::get_employee)
                .patch(routes::employees::update_employee)
                .delete(routes::employees::delete_employee),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let dashboard_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route("/dashboard/*rest", get(routes::dashboard::dashboard))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            page_gate_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", public_api.merge(protected_api))
        .merge(dashboard_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session gate for API routes
///
/// Resolves the bearer token or session cookie and inserts the resulting
/// `AuthContext` into request extensions. Anonymous requests get a 401
/// before any handler runs.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = state.sessions.resolve(request.headers()).map_err(|e| {
        debug!(error = %e, path = %request.uri().path(), "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Session gate for dashboard pages
///
/// Same resolution as [`session_auth_layer`], but anonymous visitors are
/// redirected to the login page instead of receiving an error body.
async fn page_gate_layer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match state.sessions.resolve(request.headers()) {
        Ok(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, path = %request.uri().path(), "Redirecting anonymous visitor");
            Redirect::to(LOGIN_PAGE).into_response()
        }
    }
}
