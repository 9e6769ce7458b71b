use crate::availability::availability;
use crate::backend::{AppointmentStore, ScheduleStore};
use crate::configuration::Configuration;
use crate::conflicts::ConflictPolicy;
use crate::error::BookingError;
use crate::lifecycle::{effective_status, validate_transition};
use crate::notification::{self, NotificationIntent};
use crate::schedule::WeeklySchedule;
use crate::types::{hhmm, Appointment, AppointmentStatus, NewAppointment};
use crate::AppState;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_valid::Valid;
use chrono::{Local, NaiveDate, NaiveTime};
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::WatchStream;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref TIME_FORMAT: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookingRequest {
    provider_id: Uuid,
    client_id: Uuid,
    date: NaiveDate,
    #[validate(regex(path = *TIME_FORMAT))]
    time: String,
    #[validate(length(max = 120))]
    service: Option<String>,
    #[validate(range(min = 0.0))]
    price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusUpdateRequest {
    status: AppointmentStatus,
    version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotsQuery {
    provider_id: Uuid,
    date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppointmentsQuery {
    provider_id: Option<Uuid>,
    client_id: Option<Uuid>,
}

/// Listing view: the stored appointment plus its display status.
#[derive(Debug, Clone, Serialize)]
struct AppointmentView {
    #[serde(flatten)]
    appointment: Appointment,
    effective_status: AppointmentStatus,
}

pub fn create_app<B, C>(backend: B, configuration: C) -> Router
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        backend,
        configuration,
    };

    let public = Router::new()
        .route("/slots", get(get_slots::<B, C>))
        .route("/book", post(book_slot::<B, C>))
        .route("/appointments", get(get_appointments::<B, C>))
        .route("/schedule/:provider_id/watch", get(watch_schedule::<B, C>));

    let provider = Router::new()
        .route(
            "/schedule/:provider_id",
            get(get_schedule::<B, C>).put(put_schedule::<B, C>),
        )
        .route(
            "/appointments/:id/status",
            post(update_appointment_status::<B, C>),
        )
        .route("/appointments/:id", delete(remove_appointment::<B, C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            provider_auth::<B, C>,
        ));

    Router::new()
        .merge(public)
        .merge(provider)
        .with_state(state)
        .layer(cors)
}

async fn provider_auth<B, C>(
    State(state): State<AppState<B, C>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)>
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    match request.headers().get("x-provider-key") {
        Some(header) if header.to_str().unwrap_or("") == state.configuration.provider_key() => {
            Ok(next.run(request).await)
        }
        Some(_) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

fn error_response(err: BookingError) -> Response {
    let status = match &err {
        BookingError::InvalidRange { .. } | BookingError::InvalidTime(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BookingError::SlotConflict
        | BookingError::InvalidTransition { .. }
        | BookingError::StaleVersion => StatusCode::CONFLICT,
        BookingError::AppointmentNotFound => StatusCode::NOT_FOUND,
        BookingError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, err.to_string()).into_response()
}

async fn get_slots<B, C>(
    State(state): State<AppState<B, C>>,
    Query(query): Query<SlotsQuery>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let today = Local::now().date_naive();
    match availability(
        &state.backend,
        query.provider_id,
        query.date,
        today,
        ConflictPolicy::default(),
    ) {
        Ok(slots) => Json(slots).into_response(),
        Err(err) => error_response(err),
    }
}

async fn book_slot<B, C>(
    State(state): State<AppState<B, C>>,
    Valid(Json(booking)): Valid<Json<BookingRequest>>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let time = match NaiveTime::parse_from_str(&booking.time, hhmm::FORMAT) {
        Ok(time) => time,
        Err(_) => return error_response(BookingError::InvalidTime(booking.time)),
    };

    let new = NewAppointment {
        provider_id: booking.provider_id,
        client_id: booking.client_id,
        date: booking.date,
        time,
        service: booking.service,
        price: booking.price,
    };

    match state.backend.create_appointment(new) {
        Ok(appointment) => {
            notification::signal(NotificationIntent::BookingRequested, &appointment);
            (StatusCode::CREATED, Json(appointment)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn get_appointments<B, C>(
    State(state): State<AppState<B, C>>,
    Query(query): Query<AppointmentsQuery>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let appointments = match (query.provider_id, query.client_id) {
        (Some(provider_id), None) => state.backend.appointments_by_provider(provider_id),
        (None, Some(client_id)) => state.backend.appointments_by_client(client_id),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                "Provide exactly one of provider_id or client_id".to_string(),
            )
                .into_response()
        }
    };

    match appointments {
        Ok(appointments) => {
            let now = Local::now().naive_local();
            let views: Vec<AppointmentView> = appointments
                .into_iter()
                .map(|appointment| AppointmentView {
                    effective_status: effective_status(&appointment, now),
                    appointment,
                })
                .collect();
            Json(views).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn get_schedule<B, C>(
    State(state): State<AppState<B, C>>,
    Path(provider_id): Path<Uuid>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    match state.backend.schedule(provider_id) {
        Ok(Some(schedule)) => Json(schedule).into_response(),
        // First touch by the schedule editor materializes the defaults.
        Ok(None) => {
            let schedule = WeeklySchedule::default();
            match state.backend.save_schedule(provider_id, schedule.clone()) {
                Ok(()) => Json(schedule).into_response(),
                Err(err) => error_response(err),
            }
        }
        Err(err) => error_response(err),
    }
}

async fn put_schedule<B, C>(
    State(state): State<AppState<B, C>>,
    Path(provider_id): Path<Uuid>,
    Json(schedule): Json<WeeklySchedule>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    if let Err(err) = schedule.validate() {
        return error_response(err);
    }
    match state.backend.save_schedule(provider_id, schedule) {
        Ok(()) => (StatusCode::OK, "Schedule saved successfully".to_string()).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_appointment_status<B, C>(
    State(state): State<AppState<B, C>>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let current = match state.backend.appointment(id) {
        Ok(Some(appointment)) => appointment,
        Ok(None) => return error_response(BookingError::AppointmentNotFound),
        Err(err) => return error_response(err),
    };

    if let Err(err) = validate_transition(current.status, request.status) {
        return error_response(err);
    }

    match state
        .backend
        .update_status(id, request.status, request.version)
    {
        Ok(appointment) => {
            if let Some(intent) = NotificationIntent::for_status(appointment.status) {
                notification::signal(intent, &appointment);
            }
            Json(appointment).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn remove_appointment<B, C>(
    State(state): State<AppState<B, C>>,
    Path(id): Path<Uuid>,
) -> Response
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    match state.backend.delete_appointment(id) {
        Ok(()) => (
            StatusCode::OK,
            "Appointment removed successfully".to_string(),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

async fn watch_schedule<B, C>(
    State(state): State<AppState<B, C>>,
    Path(provider_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    B: ScheduleStore + AppointmentStore,
    C: Configuration,
{
    let receiver = state.backend.subscribe(provider_id);
    let stream = WatchStream::new(receiver).map(|schedule| {
        let event = match serde_json::to_string(&schedule) {
            Ok(json) => Event::default().data(json),
            Err(err) => Event::default().comment(err.to_string()),
        };
        Ok::<Event, Infallible>(event)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
