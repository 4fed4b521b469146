//! Domain layer - Call lifecycle rules
//!
//! This layer contains:
//! - Value objects: call state, call type, app state
//! - The per-call session context
//! - The pure notification renderer
//! - Ports for the native platform services
//! - Lifecycle events

pub mod call;
pub mod lifecycle;
pub mod notification;
pub mod ports;
pub mod shared;

// Re-export commonly used types
pub use shared::{PlatformError, PlatformResult};
