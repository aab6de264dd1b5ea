//! # سرویس بیماری‌ها

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::Catalog,
    error::Result,
    models::{Disease, DiseaseFilter},
};

use super::Service;

#[derive(Clone)]
pub struct DiseaseService {
    catalog: Arc<dyn Catalog>,
}

impl Service for DiseaseService {}

impl DiseaseService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: DiseaseFilter) -> Result<Vec<Disease>> {
        let diseases = self.catalog.diseases(&filter).await?;
        debug!(count = diseases.len(), "Listed diseases");
        Ok(diseases)
    }
}
