// Dashboard domain model
use serde::Serialize;

use super::analytics::{round, AnalyticsEngine, DEFAULT_DIGITS};
use super::dataset::{DashboardDataset, DataSourceType, DatasetMeta};
use super::kpi::{Kpi, KpiId};
use super::series::AggregatedSeries;

const VARIATION_SUFFIX: &str = "%";

/// Everything the presentation layer needs to draw the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub source: DataSourceType,
    pub title: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
    pub kpis: Vec<Kpi>,
    pub timeseries: AggregatedSeries,
    pub daily: AggregatedSeries,
    pub distribution: AggregatedSeries,
}

impl Dashboard {
    pub fn build(dataset: DashboardDataset, engine: &AnalyticsEngine) -> Self {
        let kpis = engine
            .calculate_kpis(&dataset.points)
            .into_iter()
            .map(|kpi| {
                let suffix = match kpi.id {
                    KpiId::Variation => VARIATION_SUFFIX.to_string(),
                    _ => dataset.unit.clone(),
                };
                kpi.with_suffix(suffix)
            })
            .collect();

        let mut timeseries = AggregatedSeries::default();
        for point in &dataset.points {
            timeseries.push(
                engine.calendar().tick_label(&point.timestamp),
                round(point.value, DEFAULT_DIGITS),
            );
        }

        let daily = engine.build_daily_aggregation(&dataset.points);
        let distribution = engine.build_distribution(&dataset.points);

        Self {
            source: dataset.source,
            title: dataset.title,
            unit: dataset.unit,
            meta: dataset.meta,
            kpis,
            timeseries,
            daily,
            distribution,
        }
    }
}
