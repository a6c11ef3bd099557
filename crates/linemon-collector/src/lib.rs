//! Telemetry sources for production lines.
//!
//! A [`TelemetrySource`] hands the monitor one [`LineReading`] per line each
//! time it is polled. [`simulator::RandomWalkSource`] is the built-in source;
//! real plant integrations implement the same trait.

pub mod error;
pub mod simulator;

use error::Result;
use linemon_common::types::LineReading;

/// A provider of line readings, polled once per evaluation cycle.
pub trait TelemetrySource: Send + Sync {
    /// Returns the source name (e.g., `"random-walk"`), used for logging.
    fn name(&self) -> &str;

    /// Produces the latest reading for every line the source knows about.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying feed cannot be read.
    fn poll(&mut self) -> Result<Vec<LineReading>>;
}
