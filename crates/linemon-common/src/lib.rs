//! Shared data model for the linemon workspace.
//!
//! Everything the evaluation engine reads or produces lives here so that the
//! quality, alert, collector and server crates agree on one shape.

pub mod id;
pub mod types;
