//! # Disease Handlers

use axum::{extract::State, Json};

use crate::{
    api::extractors::ValidatedQuery,
    error::Result,
    models::{DiseaseQuery, DiseasesResponse},
    services::AppState,
};

/// لیست بیماری‌ها
///
/// # Endpoint
/// `GET /api/diseases?service_id=&body_part=&keyword=`
pub async fn list_diseases(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<DiseaseQuery>,
) -> Result<Json<DiseasesResponse>> {
    let filter = query.into_filter()?;
    let diseases = state.diseases.list(filter).await?;
    Ok(Json(DiseasesResponse { diseases }))
}
