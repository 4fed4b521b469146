//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Platform port adapters (no-op stand-ins, simulated device)
//! - The cancellable debounce timer

pub mod platform;
pub mod timer;

pub use platform::PlatformServices;
pub use timer::DebounceTimer;
