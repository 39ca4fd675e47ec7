// Domain layer - Pure models and the analytics engine
pub mod analytics;
pub mod calendar;
pub mod dashboard;
pub mod dataset;
pub mod kpi;
pub mod series;
