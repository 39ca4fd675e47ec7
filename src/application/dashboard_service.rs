// Dashboard service - Use case for building dashboards
use crate::application::dataset_service::{DatasetError, DatasetService};
use crate::domain::analytics::AnalyticsEngine;
use crate::domain::dashboard::Dashboard;
use crate::domain::dataset::DashboardFilters;

#[derive(Clone)]
pub struct DashboardService {
    datasets: DatasetService,
    engine: AnalyticsEngine,
}

impl DashboardService {
    pub fn new(datasets: DatasetService, engine: AnalyticsEngine) -> Self {
        Self { datasets, engine }
    }

    pub async fn get_dashboard(&self, filters: &DashboardFilters) -> Result<Dashboard, DatasetError> {
        let dataset = self.datasets.load_dataset(filters).await?;

        tracing::debug!(
            "Building dashboard for {} from {} points (cached: {})",
            dataset.source,
            dataset.points.len(),
            dataset.is_from_cache()
        );

        Ok(Dashboard::build(dataset, &self.engine))
    }
}
