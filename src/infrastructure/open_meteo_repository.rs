// Open-Meteo archive API repository implementation
use crate::application::weather_repository::WeatherRepository;
use crate::domain::dataset::DashboardFilters;
use crate::domain::series::DataPoint;
use crate::infrastructure::config::OpenMeteoSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct OpenMeteoRepository {
    client: reqwest::Client,
    settings: OpenMeteoSettings,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

/// `time` plus one array per requested hourly variable
#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(flatten)]
    variables: HashMap<String, Vec<Option<f64>>>,
}

impl OpenMeteoRepository {
    pub fn new(mut settings: OpenMeteoSettings) -> Result<Self> {
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, settings })
    }

    fn build_query_url(&self, filters: &DashboardFilters) -> String {
        format!(
            "{}/v1/archive?latitude={}&longitude={}&start_date={}&end_date={}&hourly={}&timezone={}",
            self.settings.base_url,
            self.settings.latitude,
            self.settings.longitude,
            filters.start_date.format(DATE_FORMAT),
            filters.end_date.format(DATE_FORMAT),
            urlencoding::encode(&self.settings.hourly),
            urlencoding::encode(&self.settings.timezone),
        )
    }

    async fn execute_query(&self, filters: &DashboardFilters) -> Result<ArchiveResponse> {
        let url = self.build_query_url(filters);
        tracing::debug!("Requesting Open-Meteo archive: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Open-Meteo request failed with status {}: {}", status, body);
        }

        response
            .json::<ArchiveResponse>()
            .await
            .context("Failed to parse Open-Meteo response")
    }

    /// Pair `time[i]` with `values[i]`; absent or null readings become NaN.
    fn zip_points(&self, hourly: HourlyBlock) -> Vec<DataPoint> {
        let HourlyBlock {
            time,
            mut variables,
        } = hourly;
        let values = variables.remove(&self.settings.hourly).unwrap_or_default();

        if values.len() != time.len() {
            tracing::warn!(
                "Open-Meteo returned {} timestamps but {} {} values",
                time.len(),
                values.len(),
                self.settings.hourly
            );
        }

        time.into_iter()
            .enumerate()
            .map(|(idx, timestamp)| {
                let value = values.get(idx).copied().flatten().unwrap_or(f64::NAN);
                DataPoint::new(timestamp, value)
            })
            .collect()
    }
}

#[async_trait]
impl WeatherRepository for OpenMeteoRepository {
    async fn fetch_hourly(&self, filters: &DashboardFilters) -> Result<Vec<DataPoint>> {
        let response = self.execute_query(filters).await?;

        let points = response
            .hourly
            .map(|hourly| self.zip_points(hourly))
            .unwrap_or_default();

        tracing::debug!("Open-Meteo returned {} hourly points", points.len());
        Ok(points)
    }
}
