use crate::backend::ScheduleBackend;
use crate::configuration::Configuration;
use crate::coordinator::BookingCoordinator;
use crate::error::{BookingError, BookingResult};
use crate::queries::ScheduleQueries;
use crate::search_params::{self, ScheduleParams};
use crate::session::{Session, SessionRegistry};
use crate::types::{self, Booking, Employee, Haircut};
use axum::body::Body;
use axum::extract::{Query, Request};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, Response};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new("^[A-Za-z][A-Za-z0-9 .'-]*$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct SessionRequest {
    #[validate(length(min = 1, max = 40))]
    client_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionResponse {
    token: String,
    session: Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingRequest {
    employee: Option<String>,
    haircut_id: Uuid,
    date: Option<String>,
    hour: u32,
    payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BreakRequest {
    employee: Option<String>,
    date: Option<String>,
    hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransitionRequest {
    id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct AddEmployeeRequest {
    #[validate(length(min = 1, max = 40))]
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct AddHaircutRequest {
    #[validate(length(min = 1, max = 60))]
    name: String,
    #[validate(range(min = 0.0))]
    price: f64,
    #[validate(length(max = 400))]
    description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct UpdateHaircutRequest {
    id: Uuid,
    #[validate(length(min = 1, max = 60))]
    name: String,
    #[validate(range(min = 0.0))]
    price: f64,
    #[validate(length(max = 400))]
    description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShopInfo {
    name: String,
    opening_hour: u32,
    closing_hour: u32,
    booking_horizon_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityResponse {
    employee: String,
    date: NaiveDate,
    slots: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

#[derive(Clone)]
pub struct AppState<B: ScheduleBackend, C: Configuration> {
    backend: B,
    coordinator: BookingCoordinator<B>,
    queries: ScheduleQueries<B>,
    sessions: SessionRegistry,
    configuration: C,
}

pub fn create_app<B: ScheduleBackend, C: Configuration>(backend: B, configuration: C) -> Router {
    let rules = configuration.booking_rules();
    let state = AppState {
        coordinator: BookingCoordinator::new(backend.clone(), rules),
        queries: ScheduleQueries::new(backend.clone(), rules),
        sessions: SessionRegistry::default(),
        backend,
        configuration,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/frontend", get(get_frontend))
        .route("/shop", get(get_shop))
        .route("/employees", get(get_employees))
        .route("/haircuts", get(get_haircuts))
        .route("/availability", get(get_availability))
        .route("/appointments", get(get_appointments))
        .route("/appointments/stream", get(stream_appointments))
        .route("/sessions", post(create_session))
        .route("/book", post(book_slot));

    let admin = Router::new()
        .route("/admin_page", get(get_admin_page))
        .route("/pay", post(pay_booking))
        .route("/cancel", post(cancel_booking))
        .route("/break", post(add_break))
        .route("/employees/add", post(add_employee))
        .route("/haircuts/add", post(add_haircut))
        .route("/haircuts/update", post(update_haircut))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<B, C>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    if let Some(auth_header) = request.headers().get("x-admin-password") {
        if auth_header.to_str().unwrap_or("") != state.configuration.password() {
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
        }
    } else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    }
    Ok(next.run(request).await)
}

fn error_status(error: &BookingError) -> StatusCode {
    match error {
        BookingError::Unauthenticated => StatusCode::UNAUTHORIZED,
        BookingError::OutOfRange { .. }
        | BookingError::InvalidTransition { .. }
        | BookingError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::Conflict { .. } | BookingError::DuplicateEmployee(_) => StatusCode::CONFLICT,
        BookingError::UnknownEmployee(_)
        | BookingError::UnknownHaircut(_)
        | BookingError::UnknownBooking(_) => StatusCode::NOT_FOUND,
        BookingError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn error_code(error: &BookingError) -> &'static str {
    match error {
        BookingError::Unauthenticated => "UNAUTHENTICATED",
        BookingError::OutOfRange { .. } => "OUT_OF_RANGE",
        BookingError::Conflict { .. } => "CONFLICT",
        BookingError::UnknownEmployee(_) => "UNKNOWN_EMPLOYEE",
        BookingError::DuplicateEmployee(_) => "DUPLICATE_EMPLOYEE",
        BookingError::UnknownHaircut(_) => "UNKNOWN_HAIRCUT",
        BookingError::UnknownBooking(_) => "UNKNOWN_BOOKING",
        BookingError::InvalidTransition { .. } => "INVALID_TRANSITION",
        BookingError::InvalidInput(_) => "INVALID_INPUT",
        BookingError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        let body = ApiError {
            code: error_code(&self).to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn invalid_input(errors: validator::ValidationErrors) -> BookingError {
    BookingError::InvalidInput(errors.to_string())
}

fn session_from(headers: &HeaderMap, sessions: &SessionRegistry) -> Option<Session> {
    headers
        .get("x-session-token")
        .and_then(|token| token.to_str().ok())
        .and_then(|token| sessions.resolve(token))
}

fn requested_slot(date: Option<&str>, hour: u32) -> BookingResult<DateTime<Utc>> {
    let date = search_params::resolve_date(date);
    types::slot_start(date, hour)
        .ok_or_else(|| BookingError::InvalidInput(format!("{hour} is not an hour of the day")))
}

async fn get_frontend<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let path = state.configuration.frontend_path();
    match fs::read_to_string(&path).await {
        Ok(contents) => Ok(Html(contents)),
        Err(err) => {
            let error_message = format!("Failed to read frontend file: {}", err);
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_message))
        }
    }
}

async fn get_admin_page() -> impl IntoResponse {
    StatusCode::OK
}

async fn get_shop<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> impl IntoResponse {
    let rules = state.configuration.booking_rules();
    Json(ShopInfo {
        name: state.configuration.shop_name(),
        opening_hour: rules.opening_hour,
        closing_hour: rules.closing_hour,
        booking_horizon_days: rules.horizon_days,
    })
}

async fn get_employees<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> BookingResult<Json<Vec<Employee>>> {
    Ok(Json(state.backend.employees()?))
}

async fn get_haircuts<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> BookingResult<Json<Vec<Haircut>>> {
    Ok(Json(state.backend.haircuts()?))
}

async fn get_availability<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Query(params): Query<ScheduleParams>,
) -> BookingResult<Json<AvailabilityResponse>> {
    let employees = state.backend.employees()?;
    let employee = search_params::resolve_employee(params.employee.as_deref(), &employees)?;
    let date = search_params::resolve_date(params.date.as_deref());
    let slots = state.queries.available_slots(&employee, date)?;
    Ok(Json(AvailabilityResponse {
        employee,
        date,
        slots,
    }))
}

async fn get_appointments<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Query(params): Query<ScheduleParams>,
) -> BookingResult<Json<Vec<Booking>>> {
    let employees = state.backend.employees()?;
    let employee = search_params::resolve_employee(params.employee.as_deref(), &employees)?;
    let date = search_params::resolve_date(params.date.as_deref());
    let status = params
        .status
        .as_deref()
        .map(|requested| search_params::resolve_status(Some(requested)));
    Ok(Json(state.queries.bookings_for(&employee, date, status)?))
}

async fn stream_appointments<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state
        .backend
        .booking_stream()
        .map(|bookings| Event::default().json_data(&bookings));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn create_session<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<SessionRequest>,
) -> BookingResult<impl IntoResponse> {
    request.validate().map_err(invalid_input)?;
    if !NAME_PATTERN.is_match(&request.client_name) {
        return Err(BookingError::InvalidInput(format!(
            "{:?} is not a valid client name",
            request.client_name
        )));
    }

    let (token, session) = state.sessions.register(request.client_name);
    Ok((StatusCode::CREATED, Json(SessionResponse { token, session })))
}

async fn book_slot<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    headers: HeaderMap,
    Json(request): Json<BookingRequest>,
) -> BookingResult<impl IntoResponse> {
    let session = session_from(&headers, &state.sessions);
    let employees = state.backend.employees()?;
    let employee = search_params::resolve_employee(request.employee.as_deref(), &employees)?;
    let slot_at = requested_slot(request.date.as_deref(), request.hour)?;
    let payment_method = search_params::resolve_payment(request.payment_method.as_deref());

    let booking = state.coordinator.book(
        session.as_ref(),
        &employee,
        request.haircut_id,
        slot_at,
        payment_method,
    )?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn add_break<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<BreakRequest>,
) -> BookingResult<impl IntoResponse> {
    let employees = state.backend.employees()?;
    let employee = search_params::resolve_employee(request.employee.as_deref(), &employees)?;
    let slot_at = requested_slot(request.date.as_deref(), request.hour)?;

    let blocker = state.coordinator.block_slot(&employee, slot_at)?;
    Ok((StatusCode::CREATED, Json(blocker)))
}

async fn pay_booking<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<TransitionRequest>,
) -> BookingResult<Json<Booking>> {
    Ok(Json(state.coordinator.pay(request.id)?))
}

async fn cancel_booking<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<TransitionRequest>,
) -> BookingResult<Json<Booking>> {
    Ok(Json(state.coordinator.cancel(request.id)?))
}

async fn add_employee<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<AddEmployeeRequest>,
) -> BookingResult<impl IntoResponse> {
    request.validate().map_err(invalid_input)?;
    if !NAME_PATTERN.is_match(&request.name) {
        return Err(BookingError::InvalidInput(format!(
            "{:?} is not a valid name",
            request.name
        )));
    }

    let employee = state.backend.add_employee(request.name)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn add_haircut<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<AddHaircutRequest>,
) -> BookingResult<impl IntoResponse> {
    request.validate().map_err(invalid_input)?;
    let haircut = state
        .backend
        .add_haircut(request.name, request.price, request.description)?;
    Ok((StatusCode::CREATED, Json(haircut)))
}

async fn update_haircut<B: ScheduleBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Json(request): Json<UpdateHaircutRequest>,
) -> BookingResult<Json<Haircut>> {
    request.validate().map_err(invalid_input)?;
    let haircut = Haircut {
        id: request.id,
        name: request.name,
        price: request.price,
        description: request.description,
    };
    state.backend.update_haircut(haircut.clone())?;
    Ok(Json(haircut))
}
