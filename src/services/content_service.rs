//! # سرویس محتوای صفحات
//!
//! متن و تصویر صفحات عمومی (مثلا `about`) به زبان درخواست.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::Catalog,
    error::{AppError, Result},
    models::{PageContent, TextContent},
    utils::localized,
    validation::Lang,
};

use super::Service;

#[derive(Clone)]
pub struct ContentService {
    catalog: Arc<dyn Catalog>,
}

impl Service for ContentService {}

impl ContentService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// محتوای محلی‌شده صفحه: اولین بلوک متن و اولین تصویر
    ///
    /// # Errors
    /// - `NotFound`: صفحه نه متن داره نه تصویر
    #[instrument(skip(self))]
    pub async fn page(&self, page: &str, lang: Lang) -> Result<PageContent> {
        let blocks = self.catalog.text_blocks(page).await?;
        let pictures = self.catalog.pictures(page).await?;

        if blocks.is_empty() && pictures.is_empty() {
            return Err(AppError::NotFound(format!("Page '{page}' has no content")));
        }

        debug!(blocks = blocks.len(), pictures = pictures.len(), "Resolved page content");

        let (title, content) = blocks.first().map_or_else(
            || (String::new(), String::new()),
            |block| {
                (
                    localized(&block.title_en, &block.title_ar, lang).to_string(),
                    localized(&block.content_en, &block.content_ar, lang).to_string(),
                )
            },
        );

        Ok(PageContent {
            title,
            content,
            image: pictures.into_iter().next().map(|p| p.url),
        })
    }

    /// همه بلوک‌های متنی صفحه به ترتیب نمایش
    #[instrument(skip(self))]
    pub async fn blocks(&self, page: &str) -> Result<Vec<TextContent>> {
        Ok(self.catalog.text_blocks(page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ReadThroughCatalog, SnapshotCatalog};
    use pretty_assertions::assert_eq;

    fn service() -> ContentService {
        let snapshot = Arc::new(SnapshotCatalog::bundled().unwrap());
        ContentService::new(Arc::new(ReadThroughCatalog::snapshot_only(snapshot)))
    }

    #[tokio::test]
    async fn test_page_in_both_languages() {
        let svc = service();

        let en = svc.page("about", Lang::En).await.unwrap();
        assert_eq!(en.title, "About Us");
        assert_eq!(en.image.as_deref(), Some("/images/pages/about-building.jpg"));

        let ar = svc.page("about", Lang::Ar).await.unwrap();
        assert_eq!(ar.title, "من نحن");
        assert_eq!(ar.image, en.image);
    }

    #[tokio::test]
    async fn test_missing_arabic_falls_back_to_english() {
        let page = service().page("visitors", Lang::Ar).await.unwrap();
        assert_eq!(page.title, "Visiting Hours");
        assert_eq!(page.image, None);
    }

    #[tokio::test]
    async fn test_picture_only_page() {
        let page = service().page("gallery", Lang::En).await.unwrap();
        assert_eq!(page.title, "");
        assert!(page.image.is_some());
    }

    #[tokio::test]
    async fn test_unknown_page() {
        let err = service().page("careers", Lang::En).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service().blocks("careers").await.unwrap().is_empty());
    }
}
