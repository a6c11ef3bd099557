//! Quality analysis for production lines.
//!
//! [`analyzer::QualityAnalyzer`] turns a line's cumulative output into
//! [`QualityMetrics`](linemon_common::types::QualityMetrics), delegating the
//! defect-rate trend to a per-line [`trend::TrendTracker`]. The
//! [`summary`] and [`production`] modules aggregate per-line figures into
//! plant-wide views.

pub mod analyzer;
pub mod error;
pub mod production;
pub mod summary;
pub mod trend;
