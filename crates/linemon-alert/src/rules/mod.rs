pub mod metric;
pub mod quality_trend;
pub mod status;
