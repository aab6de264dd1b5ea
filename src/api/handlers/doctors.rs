//! # Doctor Handlers

use axum::{extract::State, Json};

use crate::{
    api::extractors::{PathParam, ValidatedQuery},
    error::{AppError, Result},
    models::{DoctorId, DoctorQuery, DoctorResponse, DoctorsResponse},
    services::AppState,
};

/// لیست پزشکان
///
/// # Endpoint
/// `GET /api/doctors?service_id=&disease_id=&keyword_name=&keyword_general=&head_of_dep=`
///
/// # Response
/// ```json
/// { "doctors": [ { "id": "00001", "name_en": "...", "head_of_dep": "1", ... } ] }
/// ```
pub async fn list_doctors(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<DoctorQuery>,
) -> Result<Json<DoctorsResponse>> {
    let filter = query.into_filter()?;
    let doctors = state.doctors.list(filter).await?;
    Ok(Json(DoctorsResponse { doctors }))
}

/// یک پزشک با شناسه (`9` یا `00009`)
///
/// # Endpoint
/// `GET /api/doctors/:id`
pub async fn get_doctor(
    State(state): State<AppState>,
    PathParam(raw): PathParam,
) -> Result<Json<DoctorResponse>> {
    let id = DoctorId::parse(&raw)
        .ok_or_else(|| AppError::invalid("id", "must be a positive integer"))?;
    let doctor = state.doctors.get(id).await?;
    Ok(Json(DoctorResponse { doctor }))
}
