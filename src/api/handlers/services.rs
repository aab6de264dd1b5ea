//! # Medical Service Handlers

use axum::{extract::State, Json};

use crate::{
    api::extractors::{PathParam, ValidatedQuery},
    error::{AppError, Result},
    models::{ServiceQuery, ServiceResponse, ServicesResponse},
    services::AppState,
    validation::{parse_slug, validate_id},
};

/// لیست سرویس‌ها
///
/// # Endpoint
/// `GET /api/services?disease_id=&department_id=&keyword=`
pub async fn list_services(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ServiceQuery>,
) -> Result<Json<ServicesResponse>> {
    let filter = query.into_filter()?;
    let services = state.medical_services.list(filter).await?;
    Ok(Json(ServicesResponse { services }))
}

/// سرویس با slug (انگلیسی یا عربی)
///
/// # Endpoint
/// `GET /api/services/:slug`
pub async fn get_service_by_slug(
    State(state): State<AppState>,
    PathParam(raw): PathParam,
) -> Result<Json<ServiceResponse>> {
    let slug = parse_slug("slug", &raw)?;
    let service = state.medical_services.by_slug(&slug).await?;
    Ok(Json(ServiceResponse { service }))
}

/// سرویس با شناسه
///
/// # Endpoint
/// `GET /api/services/id/:id`
pub async fn get_service_by_id(
    State(state): State<AppState>,
    PathParam(raw): PathParam,
) -> Result<Json<ServiceResponse>> {
    let id = validate_id(&raw).ok_or_else(|| AppError::invalid("id", "must be a positive integer"))?;
    let service = state.medical_services.by_id(id).await?;
    Ok(Json(ServiceResponse { service }))
}
