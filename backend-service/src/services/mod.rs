//! Services module for backend-service.

pub mod database;
pub mod metrics;

pub use database::Database;
pub use metrics::init_metrics;
