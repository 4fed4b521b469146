//! Application layer - Services that drive the platform ports
//!
//! The coordinator owns the canonical call state and orchestrates the three
//! leaf services:
//! - Screen-wake guard
//! - Audio routing adapter
//! - Call notification presenter

pub mod audio_routing;
pub mod coordinator;
pub mod presenter;
pub mod wake_guard;

pub use audio_routing::AudioRoutingAdapter;
pub use coordinator::CallLifecycleCoordinator;
pub use presenter::{CallNotificationPresenter, ForegroundServiceHandle, PresentOutcome};
pub use wake_guard::ScreenWakeGuard;
