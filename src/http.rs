use crate::backend::{BackendError, ScheduleBackend};
use crate::configuration::Configuration;
use crate::types::{Appointment, Availability, Period, Role, Slot, SlotKey, User};
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_valid::Valid;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct AppState<T: ScheduleBackend> {
    backend: T,
}

#[derive(Debug, Clone, Deserialize)]
struct DateQuery {
    date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
struct CancelQuery {
    id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SetAvailabilityRequest {
    date: NaiveDate,
    period: Period,
    slot: Slot,
    available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BookSlotRequest {
    date: NaiveDate,
    period: Period,
    slot: Slot,
    #[validate(length(min = 1, message = "ticket id must not be empty"))]
    ticket_id: String,
    comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct LoginRequest {
    #[validate(length(min = 1))]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
    role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct UpdateUserRoleRequest {
    #[validate(length(min = 1))]
    email: String,
    role: Role,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match self {
            BackendError::Validation(_) => StatusCode::BAD_REQUEST,
            BackendError::Conflict => StatusCode::CONFLICT,
            BackendError::NotFound => StatusCode::NOT_FOUND,
            BackendError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn create_app<T: ScheduleBackend>(backend: T, configuration: impl Configuration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Role gating lives in the frontends; these routes assume the caller has
    // already been authorized. Only user management sits behind the admin
    // password.
    let public = Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/availability", get(get_availability).post(set_availability))
        .route(
            "/appointments",
            get(get_appointments).post(book_slot).delete(cancel_appointment),
        );

    let admin = Router::new()
        .route(
            "/users",
            get(get_users).post(create_user).patch(update_user_role),
        )
        .route_layer(middleware::from_fn_with_state(
            configuration.admin_password(),
            admin_auth,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(AppState { backend })
        .layer(cors)
}

async fn admin_auth(
    State(admin_password): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    if let Some(auth_header) = request.headers().get("x-admin-password") {
        if auth_header.to_str().unwrap_or("") != admin_password {
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
        }
    } else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    }
    Ok(next.run(request).await)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn get_availability<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Availability>>, BackendError> {
    Ok(Json(state.backend.availability(query.date)?))
}

async fn set_availability<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<String, BackendError> {
    let key = SlotKey {
        date: request.date,
        period: request.period,
        slot: request.slot,
    };
    state.backend.set_availability(key, request.available)?;
    Ok("Availability updated successfully".to_string())
}

async fn get_appointments<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Appointment>>, BackendError> {
    Ok(Json(state.backend.appointments(query.date)?))
}

async fn book_slot<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Valid(Json(request)): Valid<Json<BookSlotRequest>>,
) -> Result<(StatusCode, Json<Appointment>), BackendError> {
    let key = SlotKey {
        date: request.date,
        period: request.period,
        slot: request.slot,
    };
    let appointment = state
        .backend
        .book_slot(key, &request.ticket_id, request.comment)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn cancel_appointment<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<CancelQuery>,
) -> Result<String, BackendError> {
    state.backend.cancel_appointment(query.id)?;
    Ok("Appointment cancelled successfully".to_string())
}

async fn login<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Valid(Json(credentials)): Valid<Json<LoginRequest>>,
) -> Response {
    match state
        .backend
        .authenticate(&credentials.email, &credentials.password)
    {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_users<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
) -> Result<Json<Vec<User>>, BackendError> {
    Ok(Json(state.backend.users()?))
}

async fn create_user<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<User>), BackendError> {
    let user = state
        .backend
        .create_user(&request.email, &request.password, request.role)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user_role<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    Valid(Json(request)): Valid<Json<UpdateUserRoleRequest>>,
) -> Result<String, BackendError> {
    state.backend.update_user_role(&request.email, request.role)?;
    Ok("User role updated successfully".to_string())
}
