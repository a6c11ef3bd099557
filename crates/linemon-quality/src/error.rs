/// Errors raised when validating quality-analysis settings.
///
/// # Examples
///
/// ```rust
/// use linemon_quality::error::QualityError;
///
/// let err = QualityError::InvalidTrendConfig("window must be at least 2".to_string());
/// assert!(err.to_string().contains("window"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    /// Trend classification settings are inconsistent.
    #[error("Quality: invalid trend configuration: {0}")]
    InvalidTrendConfig(String),
}

/// Convenience `Result` alias for quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;
