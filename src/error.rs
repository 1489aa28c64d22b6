//! Error types for the projectile engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ProjectileError>;

/// Everything that can go wrong while setting up or summarising a run.
///
/// Integration itself never fails: bad runs come back empty and are reported
/// as [`ProjectileError::DegenerateRun`] by whatever consumes them.
#[derive(Debug, Error)]
pub enum ProjectileError {
    /// A launch parameter is out of its physical range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the parameter file.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// What the value should have been.
        reason: &'static str,
    },

    /// A run produced no samples to summarise or resample.
    #[error("degenerate run: {0}")]
    DegenerateRun(String),

    /// A parameter file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProjectileError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateRun(message.into())
    }
}

impl From<std::io::Error> for ProjectileError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ProjectileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = ProjectileError::invalid("gravity", -9.8, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter `gravity` = -9.8: must be positive"
        );
    }

    #[test]
    fn test_json_error_becomes_config() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ProjectileError = parse_err.into();
        assert!(matches!(err, ProjectileError::Config(_)));
    }
}
