// KPI domain models
use serde::{Deserialize, Serialize};

/// Variation (in percent) beyond which the series counts as moving
pub const TREND_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiId {
    Average,
    Max,
    Min,
    Variation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_variation(variation: f64) -> Self {
        if variation > TREND_THRESHOLD {
            Self::Up
        } else if variation < -TREND_THRESHOLD {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Single summary metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: KpiId,
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl Kpi {
    pub fn new(id: KpiId, label: &str, value: f64, trend: Trend) -> Self {
        Self {
            id,
            label: label.to_string(),
            value,
            suffix: None,
            helper_text: None,
            trend: Some(trend),
        }
    }

    pub fn with_helper_text(mut self, helper_text: String) -> Self {
        self.helper_text = Some(helper_text);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}
