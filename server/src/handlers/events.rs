use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::IntoResponse,
    Json,
};

use crate::auth::ClubAdmin;
use crate::handlers::form::read_event_form;
use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::message;

/// Event ids are opaque in the path. One that is not an integer cannot name
/// any row, which the service treats like an id that matches nothing.
fn parse_event_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

pub async fn create_event(
    State(state): State<AppState>,
    admin: ClubAdmin,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let form = read_event_form(multipart).await?;
    let request = CreateEventRequest::from_form(form)?;

    state.events.create(&admin, request).await?;
    Ok(message("Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    admin: ClubAdmin,
    Path(event_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let form = read_event_form(multipart).await?;

    state
        .events
        .update(&admin, parse_event_id(&event_id), UpdateEventRequest::from(form))
        .await?;
    Ok(message("Event updated successfully"))
}

pub async fn my_events(
    State(state): State<AppState>,
    admin: ClubAdmin,
) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list_own(&admin).await?;
    Ok(Json(events))
}

pub async fn list_registrations(
    State(state): State<AppState>,
    admin: ClubAdmin,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let students = state
        .events
        .registrations(&admin, parse_event_id(&event_id))
        .await?;
    Ok(Json(students))
}

pub async fn delete_event(
    State(state): State<AppState>,
    admin: ClubAdmin,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete(&admin, parse_event_id(&event_id)).await?;
    Ok(message("Event deleted successfully"))
}
