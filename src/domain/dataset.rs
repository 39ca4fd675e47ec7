// Dataset domain models: sources, filters and fetched series
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::analytics::sort_by_date;
use super::series::DataPoint;

/// Width of the default date range, and of the range used when start > end
pub const DEFAULT_RANGE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceType {
    #[serde(rename = "open-meteo")]
    OpenMeteo,
}

impl DataSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenMeteo => "open-meteo",
        }
    }

    /// Title shown above the source's charts
    pub fn dataset_title(&self) -> &'static str {
        match self {
            Self::OpenMeteo => "Temperatura - São Paulo",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::OpenMeteo => "°C",
        }
    }
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown data source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for DataSourceType {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open-meteo" => Ok(Self::OpenMeteo),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// Catalogue entry describing a selectable source
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceOption {
    pub id: DataSourceType,
    pub title: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

pub const DATA_SOURCE_OPTIONS: &[DataSourceOption] = &[DataSourceOption {
    id: DataSourceType::OpenMeteo,
    title: "Temperatura (Open-Meteo)",
    description: "Série horária de temperatura em São Paulo",
    unit: "°C",
}];

/// Date range and source requested by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_source: DataSourceType,
}

impl DashboardFilters {
    pub fn new(data_source: DataSourceType, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            data_source,
        }
    }

    /// The `days`-wide range ending on `today`
    pub fn last_days(data_source: DataSourceType, today: NaiveDate, days: i64) -> Self {
        Self::new(data_source, today - Duration::days(days), today)
    }

    /// An inverted range is replaced by the default-width range ending on `end_date`.
    pub fn normalized(&self) -> Self {
        if self.start_date > self.end_date {
            return Self::last_days(self.data_source, self.end_date, DEFAULT_RANGE_DAYS);
        }
        self.clone()
    }
}

/// Provenance of a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DatasetMeta {
    pub fn fresh(updated_at: DateTime<Utc>) -> Self {
        Self {
            from_cache: Some(false),
            updated_at: Some(updated_at),
            extra: HashMap::new(),
        }
    }
}

/// A fetched series together with what it measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDataset {
    pub source: DataSourceType,
    pub title: String,
    pub unit: String,
    pub points: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
}

impl DashboardDataset {
    /// Drops non-finite values and orders the rest by timestamp
    pub fn from_points(
        source: DataSourceType,
        title: impl Into<String>,
        unit: impl Into<String>,
        points: Vec<DataPoint>,
        meta: Option<DatasetMeta>,
    ) -> Self {
        let finite: Vec<DataPoint> = points
            .into_iter()
            .filter(|point| point.value.is_finite())
            .collect();

        Self {
            source,
            title: title.into(),
            unit: unit.into(),
            points: sort_by_date(&finite),
            meta,
        }
    }

    /// Same dataset flagged as served from the cache
    pub fn into_cached(mut self) -> Self {
        let mut meta = self.meta.take().unwrap_or_default();
        meta.from_cache = Some(true);
        self.meta = Some(meta);
        self
    }

    pub fn is_from_cache(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|meta| meta.from_cache)
            .unwrap_or(false)
    }
}
