/// Errors raised while configuring or polling a telemetry source.
///
/// # Examples
///
/// ```rust
/// use linemon_collector::error::CollectorError;
///
/// let err = CollectorError::DuplicateLine("LINE-A1".to_string());
/// assert!(err.to_string().contains("LINE-A1"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// The source was configured without any lines.
    #[error("Collector: no production lines configured")]
    NoLines,

    /// Two configured lines share the same identifier.
    #[error("Collector: duplicate line id '{0}'")]
    DuplicateLine(String),

    /// A line's target speed is zero, negative, or not finite.
    #[error("Collector: line '{line_id}' has invalid target speed {target_speed}")]
    InvalidTargetSpeed { line_id: String, target_speed: f64 },

    /// The telemetry feed could not be read.
    #[error("Collector: source unavailable: {0}")]
    Unavailable(String),
}

/// Convenience `Result` alias for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;
