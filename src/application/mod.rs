// Application layer - Use cases and the ports they depend on
pub mod dashboard_service;
pub mod dataset_cache;
pub mod dataset_service;
pub mod weather_repository;
