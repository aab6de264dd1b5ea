//! # Search Suggestion Handler

use axum::{extract::State, Json};

use crate::{
    api::extractors::ValidatedQuery,
    error::Result,
    models::{SuggestionQuery, SuggestionsResponse},
    services::AppState,
};

/// پیشنهادهای جعبه جستجو
///
/// # Endpoint
/// `GET /api/suggestions?keyword=card&lang=en&limit=5`
///
/// # Response
/// ```json
/// { "suggestions": [ { "kind": "service", "label": "Cardiology", "target": "cardiology" } ] }
/// ```
pub async fn get_suggestions(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SuggestionQuery>,
) -> Result<Json<SuggestionsResponse>> {
    let params = query.into_params()?;
    let suggestions = state.suggestions.suggest(params).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}
