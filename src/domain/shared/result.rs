//! Platform result type

use super::error::PlatformError;

/// Standard result type for platform port operations
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
