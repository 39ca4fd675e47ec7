// Cache trait for the last good dataset of each source
use crate::domain::dataset::{DashboardDataset, DataSourceType};
use async_trait::async_trait;

#[async_trait]
pub trait DatasetCache: Send + Sync {
    /// Last stored dataset for `source`, `None` when nothing usable is cached
    async fn load(&self, source: DataSourceType) -> anyhow::Result<Option<DashboardDataset>>;

    /// Replace the stored blob for the dataset's source
    async fn store(&self, dataset: &DashboardDataset) -> anyhow::Result<()>;
}
