// File-backed dataset cache: one JSON blob per source
use crate::application::dataset_cache::DatasetCache;
use crate::domain::dataset::{DashboardDataset, DataSourceType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileDatasetCache {
    dir: PathBuf,
}

impl FileDatasetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, source: DataSourceType) -> PathBuf {
        self.dir.join(format!("dashboard-cache-{}.json", source))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DatasetCache for FileDatasetCache {
    async fn load(&self, source: DataSourceType) -> Result<Option<DashboardDataset>> {
        let path = self.path_for(source);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache file {}", path.display()));
            }
        };

        match serde_json::from_slice::<DashboardDataset>(&bytes) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn store(&self, dataset: &DashboardDataset) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;

        let path = self.path_for(dataset.source);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(dataset).context("Failed to serialize dataset")?;

        // Write then rename so readers never see a half-written blob
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .with_context(|| format!("Failed to write cache file {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to replace cache file {}", path.display()))?;

        tracing::debug!("Cached {} points at {}", dataset.points.len(), path.display());
        Ok(())
    }
}
