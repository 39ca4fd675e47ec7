// Dataset service - Use case for loading a source's series with cache fallback
use crate::application::dataset_cache::DatasetCache;
use crate::application::weather_repository::WeatherRepository;
use crate::domain::dataset::{
    DashboardDataset, DashboardFilters, DataSourceOption, DataSourceType, DatasetMeta,
    DATA_SOURCE_OPTIONS,
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Could not load data from {data_source}: {cause}")]
    Unavailable {
        data_source: DataSourceType,
        #[source]
        cause: anyhow::Error,
    },
}

#[derive(Clone)]
pub struct DatasetService {
    repository: Arc<dyn WeatherRepository>,
    cache: Arc<dyn DatasetCache>,
}

impl DatasetService {
    pub fn new(repository: Arc<dyn WeatherRepository>, cache: Arc<dyn DatasetCache>) -> Self {
        Self { repository, cache }
    }

    pub fn list_sources(&self) -> &'static [DataSourceOption] {
        DATA_SOURCE_OPTIONS
    }

    /// Fetch a fresh dataset and remember it; serve the cached one when the
    /// fetch fails.
    pub async fn load_dataset(
        &self,
        filters: &DashboardFilters,
    ) -> Result<DashboardDataset, DatasetError> {
        let filters = filters.normalized();

        let fetch_error = match self.fetch_dataset(&filters).await {
            Ok(dataset) => {
                if let Err(e) = self.cache.store(&dataset).await {
                    tracing::warn!("Failed to cache dataset for {}: {:#}", filters.data_source, e);
                }
                return Ok(dataset);
            }
            Err(e) => e,
        };

        tracing::warn!(
            "Fetching {} failed, trying cache: {:#}",
            filters.data_source,
            fetch_error
        );

        match self.cache.load(filters.data_source).await {
            Ok(Some(cached)) => {
                tracing::info!(
                    "Serving cached dataset for {} ({} points)",
                    filters.data_source,
                    cached.points.len()
                );
                Ok(cached.into_cached())
            }
            Ok(None) => Err(DatasetError::Unavailable {
                data_source: filters.data_source,
                cause: fetch_error,
            }),
            Err(cache_error) => {
                tracing::error!(
                    "Reading cache for {} failed: {:#}",
                    filters.data_source,
                    cache_error
                );
                Err(DatasetError::Unavailable {
                    data_source: filters.data_source,
                    cause: fetch_error,
                })
            }
        }
    }

    async fn fetch_dataset(&self, filters: &DashboardFilters) -> anyhow::Result<DashboardDataset> {
        let points = self.repository.fetch_hourly(filters).await?;

        tracing::debug!(
            "Fetched {} points for {} ({} .. {})",
            points.len(),
            filters.data_source,
            filters.start_date,
            filters.end_date
        );

        Ok(DashboardDataset::from_points(
            filters.data_source,
            filters.data_source.dataset_title(),
            filters.data_source.unit(),
            points,
            Some(DatasetMeta::fresh(Utc::now())),
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{MemoryCache, StubRepository};
    use super::*;
    use crate::domain::series::DataPoint;
    use chrono::NaiveDate;

    fn filters(start: &str, end: &str) -> DashboardFilters {
        DashboardFilters::new(
            DataSourceType::OpenMeteo,
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
    }

    fn sample_points() -> Vec<DataPoint> {
        vec![
            DataPoint::new("2024-01-01T01:00", 21.0),
            DataPoint::new("2024-01-01T00:00", 20.0),
            DataPoint::new("2024-01-01T02:00", f64::NAN),
        ]
    }

    #[tokio::test]
    async fn test_load_dataset_fetches_and_caches() {
        let repository = Arc::new(StubRepository::with_points(sample_points()));
        let cache = Arc::new(MemoryCache::default());
        let service = DatasetService::new(repository.clone(), cache.clone());

        let dataset = service
            .load_dataset(&filters("2024-01-01", "2024-01-02"))
            .await
            .unwrap();

        assert_eq!(dataset.title, "Temperatura - São Paulo");
        assert_eq!(dataset.unit, "°C");
        assert_eq!(dataset.points.len(), 2);
        assert_eq!(dataset.points[0].value, 20.0);
        assert!(!dataset.is_from_cache());

        let cached = cache.entries.lock().unwrap();
        assert_eq!(cached.get(&DataSourceType::OpenMeteo), Some(&dataset));
    }

    #[tokio::test]
    async fn test_load_dataset_normalizes_inverted_range() {
        let repository = Arc::new(StubRepository::with_points(vec![]));
        let service = DatasetService::new(repository.clone(), Arc::new(MemoryCache::default()));

        service
            .load_dataset(&filters("2024-03-01", "2024-02-20"))
            .await
            .unwrap();

        let requests = repository.requests.lock().unwrap();
        assert_eq!(requests[0], filters("2024-02-13", "2024-02-20"));
    }

    #[tokio::test]
    async fn test_load_dataset_falls_back_to_cache() {
        let cache = Arc::new(MemoryCache::default());
        let warm = DatasetService::new(
            Arc::new(StubRepository::with_points(sample_points())),
            cache.clone(),
        );
        warm.load_dataset(&filters("2024-01-01", "2024-01-02"))
            .await
            .unwrap();

        let cold = DatasetService::new(Arc::new(StubRepository::failing()), cache.clone());
        let dataset = cold
            .load_dataset(&filters("2024-01-01", "2024-01-02"))
            .await
            .unwrap();

        assert!(dataset.is_from_cache());
        assert_eq!(dataset.points.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dataset_without_cache_fails() {
        let service = DatasetService::new(
            Arc::new(StubRepository::failing()),
            Arc::new(MemoryCache::default()),
        );

        let err = service
            .load_dataset(&filters("2024-01-01", "2024-01-02"))
            .await
            .unwrap_err();

        let DatasetError::Unavailable { data_source, cause } = err;
        assert_eq!(data_source, DataSourceType::OpenMeteo);
        assert!(cause.to_string().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_fail_request() {
        let cache = Arc::new(MemoryCache {
            fail_writes: true,
            ..Default::default()
        });
        let service = DatasetService::new(
            Arc::new(StubRepository::with_points(sample_points())),
            cache,
        );

        let dataset = service
            .load_dataset(&filters("2024-01-01", "2024-01-02"))
            .await
            .unwrap();

        assert_eq!(dataset.points.len(), 2);
    }

    #[test]
    fn test_list_sources() {
        let service = DatasetService::new(
            Arc::new(StubRepository::failing()),
            Arc::new(MemoryCache::default()),
        );

        let sources = service.list_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, DataSourceType::OpenMeteo);
    }
}
