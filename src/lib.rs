//! Call lifecycle and background persistence
//!
//! Keeps a voice or video call alive and visible while the host app moves
//! between foreground and background: screen wake-lock, audio routing and an
//! actionable foreground-service notification, all driven from one
//! coordinator.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::CallLifecycleCoordinator;
pub use domain::call::{CallInputs, CallState, CallType};
pub use domain::lifecycle::AppState;
pub use domain::shared::error::PlatformError;
pub use domain::shared::result::PlatformResult;
