//! # Event Handlers

use axum::{extract::State, Json};

use crate::{
    api::extractors::{PathParam, ValidatedQuery},
    error::Result,
    models::{EventQuery, EventResponse, EventsResponse},
    services::AppState,
    validation::parse_slug,
};

/// جدیدترین رویدادها
///
/// # Endpoint
/// `GET /api/events?limit=3`
pub async fn list_events(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<EventQuery>,
) -> Result<Json<EventsResponse>> {
    let filter = query.into_filter()?;
    let events = state.events.list(filter).await?;
    Ok(Json(EventsResponse { events }))
}

/// یک رویداد با slug
///
/// # Endpoint
/// `GET /api/events/:slug`
pub async fn get_event(
    State(state): State<AppState>,
    PathParam(raw): PathParam,
) -> Result<Json<EventResponse>> {
    let slug = parse_slug("slug", &raw)?;
    let event = state.events.by_slug(&slug).await?;
    Ok(Json(EventResponse { event }))
}
