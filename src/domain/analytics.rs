//! Analytics engine: KPI summaries and chart aggregations over a point series.
//!
//! Every operation is a pure function of its input. Unparseable timestamps
//! never panic: they sort after every valid point and aggregate under
//! [`INVALID_DATE_LABEL`](super::calendar::INVALID_DATE_LABEL).

use std::collections::HashMap;

use super::calendar::CalendarConvention;
use super::kpi::{Kpi, KpiId, Trend};
use super::series::{AggregatedSeries, DataPoint};

/// Digits kept on every emitted number
pub const DEFAULT_DIGITS: i32 = 2;

/// Round half away from zero to `digits` decimals. Never yields negative zero.
pub fn round(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor + 0.0
}

/// Non-finite or missing reads count as zero
pub fn to_number(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Shortest decimal form without trailing zeros ("10", "20.5")
fn format_number(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Runs the analytics operations under a fixed calendar convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsEngine {
    calendar: CalendarConvention,
}

impl AnalyticsEngine {
    pub fn new(calendar: CalendarConvention) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &CalendarConvention {
        &self.calendar
    }

    /// Stable ascending sort by timestamp; the input is left untouched.
    pub fn sort_by_date(&self, points: &[DataPoint]) -> Vec<DataPoint> {
        let mut keyed: Vec<(Option<i64>, &DataPoint)> = points
            .iter()
            .map(|point| (self.calendar.epoch_millis(&point.timestamp), point))
            .collect();

        keyed.sort_by_key(|(millis, _)| (millis.is_none(), *millis));
        keyed.into_iter().map(|(_, point)| point.clone()).collect()
    }

    /// Average, max, min and variation, in that order.
    ///
    /// All four share the trend derived from the variation.
    pub fn calculate_kpis(&self, points: &[DataPoint]) -> Vec<Kpi> {
        let labels = self.calendar.locale.kpi_labels();

        if points.is_empty() {
            return vec![
                Kpi::new(KpiId::Average, labels.average, 0.0, Trend::Flat),
                Kpi::new(KpiId::Max, labels.max, 0.0, Trend::Flat),
                Kpi::new(KpiId::Min, labels.min, 0.0, Trend::Flat),
                Kpi::new(KpiId::Variation, labels.variation, 0.0, Trend::Flat)
                    .with_helper_text(labels.no_data.to_string()),
            ];
        }

        let sorted = self.sort_by_date(points);
        let values: Vec<f64> = sorted.iter().map(|point| point.value).collect();

        let average = values.iter().sum::<f64>() / values.len() as f64;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let first = values.first().copied().unwrap_or(0.0);
        let last = values.last().copied().unwrap_or(0.0);

        let variation = if first == 0.0 {
            0.0
        } else {
            ((last - first) / first.abs()) * 100.0
        };
        let trend = Trend::from_variation(variation);

        let helper_text = format!(
            "{} → {}",
            format_number(round(last, DEFAULT_DIGITS)),
            format_number(round(first, DEFAULT_DIGITS))
        );

        vec![
            Kpi::new(KpiId::Average, labels.average, round(average, DEFAULT_DIGITS), trend),
            Kpi::new(KpiId::Max, labels.max, round(max, DEFAULT_DIGITS), trend),
            Kpi::new(KpiId::Min, labels.min, round(min, DEFAULT_DIGITS), trend),
            Kpi::new(
                KpiId::Variation,
                labels.variation,
                round(variation, DEFAULT_DIGITS),
                trend,
            )
            .with_helper_text(helper_text),
        ]
    }

    /// Mean per calendar day (day/month only, years collapse), first-seen order.
    pub fn build_daily_aggregation(&self, points: &[DataPoint]) -> AggregatedSeries {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<(String, Vec<f64>)> = Vec::new();

        for point in points {
            let label = self.calendar.day_label(&point.timestamp);
            match index.get(&label) {
                Some(&idx) => buckets[idx].1.push(point.value),
                None => {
                    index.insert(label.clone(), buckets.len());
                    buckets.push((label, vec![point.value]));
                }
            }
        }

        let mut series = AggregatedSeries::default();
        for (label, values) in buckets {
            let average = values.iter().sum::<f64>() / values.len() as f64;
            series.push(label, round(average, DEFAULT_DIGITS));
        }
        series
    }

    /// Running sum per weekday, first-seen order.
    ///
    /// The partial sum is rounded after every increment, so the result can
    /// differ from rounding the exact total once.
    pub fn build_distribution(&self, points: &[DataPoint]) -> AggregatedSeries {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut series = AggregatedSeries::default();

        for point in points {
            let label = self.calendar.weekday_label(&point.timestamp);
            match index.get(&label) {
                Some(&idx) => {
                    let running = to_number(Some(series.values[idx]));
                    series.values[idx] = round(running + point.value, DEFAULT_DIGITS);
                }
                None => {
                    index.insert(label.clone(), series.len());
                    series.push(label, round(to_number(None) + point.value, DEFAULT_DIGITS));
                }
            }
        }

        for value in series.values.iter_mut() {
            *value = round(*value, DEFAULT_DIGITS);
        }
        series
    }
}

/// [`AnalyticsEngine::sort_by_date`] with the default convention
pub fn sort_by_date(points: &[DataPoint]) -> Vec<DataPoint> {
    AnalyticsEngine::default().sort_by_date(points)
}

/// [`AnalyticsEngine::calculate_kpis`] with the default convention
pub fn calculate_kpis(points: &[DataPoint]) -> Vec<Kpi> {
    AnalyticsEngine::default().calculate_kpis(points)
}

/// [`AnalyticsEngine::build_daily_aggregation`] with the default convention
pub fn build_daily_aggregation(points: &[DataPoint]) -> AggregatedSeries {
    AnalyticsEngine::default().build_daily_aggregation(points)
}

/// [`AnalyticsEngine::build_distribution`] with the default convention
pub fn build_distribution(points: &[DataPoint]) -> AggregatedSeries {
    AnalyticsEngine::default().build_distribution(points)
}
