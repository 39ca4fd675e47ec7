//! Weather dashboard backend
//!
//! Fetches the Open-Meteo hourly temperature series, keeps the last good
//! dataset per source on disk and serves KPI summaries plus chart-ready
//! aggregations over HTTP.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
