use linemon_quality::error::QualityError;

/// Startup-time configuration errors. The engine refuses to run rather than
/// classify readings against an inconsistent table.
///
/// # Examples
///
/// ```rust
/// use linemon_alert::error::ConfigError;
///
/// let err = ConfigError::InvalidThreshold {
///     metric: "temperature",
///     reason: "warning (45) must be below critical (42)".to_string(),
/// };
/// assert!(err.to_string().contains("temperature"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A threshold pair or band is malformed.
    #[error("Config: invalid {metric} threshold: {reason}")]
    InvalidThreshold {
        metric: &'static str,
        reason: String,
    },

    /// The alert ledger cannot retain zero alerts.
    #[error("Config: alert retention must be greater than 0")]
    ZeroRetention,

    /// Trend classification settings are inconsistent.
    #[error(transparent)]
    Trend(#[from] QualityError),
}

/// Convenience `Result` alias for engine configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
