//! # سرویس رویدادها و اخبار

use std::sync::Arc;

use tracing::instrument;

use crate::{
    database::Catalog,
    error::{OptionExt, Result},
    models::{Event, EventFilter},
};

use super::Service;

#[derive(Clone)]
pub struct EventService {
    catalog: Arc<dyn Catalog>,
}

impl Service for EventService {}

impl EventService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// جدیدترین رویدادها اول
    #[instrument(skip(self))]
    pub async fn list(&self, filter: EventFilter) -> Result<Vec<Event>> {
        Ok(self.catalog.events(&filter).await?)
    }

    #[instrument(skip(self))]
    pub async fn by_slug(&self, slug: &str) -> Result<Event> {
        self.catalog
            .event_by_slug(slug)
            .await?
            .ok_or_not_found(format!("Event '{slug}' not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ReadThroughCatalog, SnapshotCatalog};

    fn service() -> EventService {
        let snapshot = Arc::new(SnapshotCatalog::bundled().unwrap());
        EventService::new(Arc::new(ReadThroughCatalog::snapshot_only(snapshot)))
    }

    #[tokio::test]
    async fn test_newest_first_with_id_tiebreak() {
        let slugs: Vec<_> = service()
            .list(EventFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.slug)
            .collect();
        assert_eq!(
            slugs,
            [
                "world-heart-day-2024",
                "stroke-awareness-talk",
                "paediatric-wing-opening",
                "blood-donation-2023"
            ]
        );
    }

    #[tokio::test]
    async fn test_by_slug() {
        let event = service().by_slug("blood-donation-2023").await.unwrap();
        assert_eq!(event.id, 4);
        assert!(service().by_slug("nope").await.is_err());
    }
}
