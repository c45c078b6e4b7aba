// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use fieldops_api::{
    ApiError, ChangePasswordRequest, CheckInRequest, CheckOutRequest, ClientRequest,
    CreateUserRequest, CreateVisitRequest, DashboardResponse, LoginRequest, LoginResponse,
    UpdateUserRequest, UserResponse, VisitFilterQuery,
};
use fieldops_persistence::{ClientData, Persistence, VisitData, VisitLogData};

mod session;

use session::SessionUser;

/// FieldOps Server - HTTP server for the FieldOps service backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer for all reads and writes.
    pub persistence: Arc<Mutex<Persistence>>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } | ApiError::EmptyExport => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                // The detail is logged; the caller gets a generic message.
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                }
            }
        }
    }
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let (token, _claims, user) =
        fieldops_api::AuthenticationService::login(&mut persistence, &req.email, &req.password)
            .map_err(|e| HttpError::from(ApiError::from(e)))?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_claims, token): SessionUser,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    fieldops_api::AuthenticationService::logout(&mut persistence, &token)
        .map_err(|e| HttpError::from(ApiError::from(e)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/visits`.
async fn handle_create_visit(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Json(req): Json<CreateVisitRequest>,
) -> Result<(StatusCode, Json<VisitData>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let visit = fieldops_api::create_visit(&mut persistence, &claims, &req)
        .map_err(HttpError::from)?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// Handler for GET `/visits`.
async fn handle_list_visits(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Query(query): Query<VisitFilterQuery>,
) -> Result<Json<Vec<VisitData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let visits = fieldops_api::list_visits(&mut persistence, &claims, &query.to_filters())
        .map_err(HttpError::from)?;
    Ok(Json(visits))
}

/// Handler for GET `/visits/{visit_id}`.
async fn handle_get_visit(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(visit_id): Path<i64>,
) -> Result<Json<VisitData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let visit =
        fieldops_api::get_visit(&mut persistence, &claims, visit_id).map_err(HttpError::from)?;
    Ok(Json(visit))
}

/// Handler for GET `/visits/{visit_id}/logs`.
async fn handle_get_visit_logs(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(visit_id): Path<i64>,
) -> Result<Json<Vec<VisitLogData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let logs = fieldops_api::get_visit_logs(&mut persistence, &claims, visit_id)
        .map_err(HttpError::from)?;
    Ok(Json(logs))
}

/// Handler for POST `/visits/{visit_id}/checkin`.
async fn handle_check_in(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(visit_id): Path<i64>,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<VisitData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let visit = fieldops_api::check_in(&mut persistence, &claims, visit_id, &req)
        .map_err(HttpError::from)?;
    Ok(Json(visit))
}

/// Handler for POST `/visits/{visit_id}/checkout`.
async fn handle_check_out(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(visit_id): Path<i64>,
    Json(req): Json<CheckOutRequest>,
) -> Result<Json<VisitData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let visit = fieldops_api::check_out(&mut persistence, &claims, visit_id, &req)
        .map_err(HttpError::from)?;
    Ok(Json(visit))
}

/// Handler for GET `/reports`.
async fn handle_list_reports(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Query(query): Query<VisitFilterQuery>,
) -> Result<Json<Vec<fieldops_persistence::ReportData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let reports = fieldops_api::list_reports(&mut persistence, &claims, &query.to_filters())
        .map_err(HttpError::from)?;
    Ok(Json(reports))
}

/// Handler for GET `/reports/export/csv`.
async fn handle_export_reports_csv(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Query(query): Query<VisitFilterQuery>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bytes =
        fieldops_api::export_reports_csv(&mut persistence, &claims, &query.to_filters())
            .map_err(HttpError::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reports.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Handler for GET `/reports/{visit_id}/pdf`.
async fn handle_report_pdf(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(visit_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bytes = fieldops_api::render_report_pdf(&mut persistence, &claims, visit_id)
        .map_err(HttpError::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Handler for GET `/dashboard`.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
) -> Result<Json<DashboardResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let dashboard =
        fieldops_api::dashboard_for(&mut persistence, &claims).map_err(HttpError::from)?;
    Ok(Json(dashboard))
}

/// Handler for POST `/users`.
async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let user = fieldops_api::register_user(&mut persistence, &claims, &req)
        .map_err(HttpError::from)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let users = fieldops_api::list_users(&mut persistence, &claims).map_err(HttpError::from)?;
    Ok(Json(users))
}

/// Handler for GET `/users/{user_id}`.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let user =
        fieldops_api::get_user(&mut persistence, &claims, user_id).map_err(HttpError::from)?;
    Ok(Json(user))
}

/// Handler for PUT `/users/{user_id}`.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let user = fieldops_api::update_user_account(&mut persistence, &claims, user_id, &req)
        .map_err(HttpError::from)?;
    Ok(Json(user))
}

/// Handler for PUT `/users/{user_id}/password`.
async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    fieldops_api::change_password(&mut persistence, &claims, user_id, &req.new_password)
        .map_err(HttpError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE `/users/{user_id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    fieldops_api::remove_user(&mut persistence, &claims, user_id).map_err(HttpError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/clients`.
async fn handle_create_client(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Json(req): Json<ClientRequest>,
) -> Result<(StatusCode, Json<ClientData>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let client = fieldops_api::create_client(&mut persistence, &claims, &req)
        .map_err(HttpError::from)?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Handler for GET `/clients`.
async fn handle_list_clients(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
) -> Result<Json<Vec<ClientData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let clients =
        fieldops_api::list_clients(&mut persistence, &claims).map_err(HttpError::from)?;
    Ok(Json(clients))
}

/// Handler for GET `/clients/{client_id}`.
async fn handle_get_client(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(client_id): Path<i64>,
) -> Result<Json<ClientData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let client = fieldops_api::get_client(&mut persistence, &claims, client_id)
        .map_err(HttpError::from)?;
    Ok(Json(client))
}

/// Handler for PUT `/clients/{client_id}`.
async fn handle_update_client(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(client_id): Path<i64>,
    Json(req): Json<ClientRequest>,
) -> Result<Json<ClientData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let client = fieldops_api::update_client(&mut persistence, &claims, client_id, &req)
        .map_err(HttpError::from)?;
    Ok(Json(client))
}

/// Handler for DELETE `/clients/{client_id}`.
async fn handle_delete_client(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims, _token): SessionUser,
    Path(client_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    fieldops_api::delete_client(&mut persistence, &claims, client_id)
        .map_err(HttpError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/visits", post(handle_create_visit))
        .route("/visits", get(handle_list_visits))
        .route("/visits/{visit_id}", get(handle_get_visit))
        .route("/visits/{visit_id}/logs", get(handle_get_visit_logs))
        .route("/visits/{visit_id}/checkin", post(handle_check_in))
        .route("/visits/{visit_id}/checkout", post(handle_check_out))
        .route("/reports", get(handle_list_reports))
        .route("/reports/export/csv", get(handle_export_reports_csv))
        .route("/reports/{visit_id}/pdf", get(handle_report_pdf))
        .route("/dashboard", get(handle_dashboard))
        .route("/users", post(handle_register_user))
        .route("/users", get(handle_list_users))
        .route("/users/{user_id}", get(handle_get_user))
        .route("/users/{user_id}", axum::routing::put(handle_update_user))
        .route(
            "/users/{user_id}/password",
            axum::routing::put(handle_change_password),
        )
        .route(
            "/users/{user_id}",
            axum::routing::delete(handle_delete_user),
        )
        .route("/clients", post(handle_create_client))
        .route("/clients", get(handle_list_clients))
        .route("/clients/{client_id}", get(handle_get_client))
        .route(
            "/clients/{client_id}",
            axum::routing::put(handle_update_client),
        )
        .route(
            "/clients/{client_id}",
            axum::routing::delete(handle_delete_client),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing FieldOps Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
