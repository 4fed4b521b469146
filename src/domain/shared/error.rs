//! Platform errors

use thiserror::Error;

/// Failure reported by a platform port (notification backend, wake-lock, audio session).
///
/// None of these abort a call. The application services log them and carry on
/// with whatever capability is left.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The native module is missing on this build
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Runtime foreground-service types differ from the manifest declaration
    #[error("Foreground service type mismatch: {0}")]
    ServiceTypeMismatch(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

impl PlatformError {
    /// Classify a raw message coming out of a native SDK.
    pub fn from_platform_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("foregroundservicetype")
            || lower.contains("foreground service type")
            || lower.contains("foreground_service_")
        {
            PlatformError::ServiceTypeMismatch(message)
        } else if lower.contains("permission") {
            PlatformError::PermissionDenied(message)
        } else if lower.contains("not available")
            || lower.contains("native module")
            || lower.contains("is null")
            || lower.contains("undefined")
        {
            PlatformError::Unavailable(message)
        } else {
            PlatformError::Platform(message)
        }
    }

    pub fn is_service_type_mismatch(&self) -> bool {
        matches!(self, PlatformError::ServiceTypeMismatch(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, PlatformError::Unavailable(_))
    }
}
