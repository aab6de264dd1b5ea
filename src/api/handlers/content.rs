//! # Page Content Handler

use axum::{extract::State, Json};

use crate::{
    api::extractors::ValidatedQuery,
    error::Result,
    models::{ContentBlocksResponse, ContentQuery, PageContent},
    services::AppState,
};

/// محتوای یک صفحه
///
/// # Endpoint
/// `GET /api/content?page=about&lang=ar`
///
/// # Response
/// ```json
/// { "title": "من نحن", "content": "...", "image": "/images/pages/about-building.jpg" }
/// ```
pub async fn get_content(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ContentQuery>,
) -> Result<Json<PageContent>> {
    let (page, lang) = query.into_params()?;
    let content = state.content.page(&page, lang).await?;
    Ok(Json(content))
}

/// همه بلوک‌های متنی صفحه به ترتیب نمایش
///
/// برای صفحه‌هایی مثل `about` که بیشتر از یک بخش دارن. `lang` نادیده
/// گرفته میشه چون هر دو زبان برگردونده میشن.
///
/// # Endpoint
/// `GET /api/content/blocks?page=about`
pub async fn get_content_blocks(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ContentQuery>,
) -> Result<Json<ContentBlocksResponse>> {
    let (page, _) = query.into_params()?;
    let blocks = state.content.blocks(&page).await?;
    Ok(Json(ContentBlocksResponse { blocks }))
}
