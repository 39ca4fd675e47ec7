// Repository trait for weather data access
use crate::domain::dataset::DashboardFilters;
use crate::domain::series::DataPoint;
use async_trait::async_trait;

#[async_trait]
pub trait WeatherRepository: Send + Sync {
    /// Fetch the hourly series for the filter's date range, in source order.
    /// Missing readings come back as NaN.
    async fn fetch_hourly(&self, filters: &DashboardFilters) -> anyhow::Result<Vec<DataPoint>>;
}
