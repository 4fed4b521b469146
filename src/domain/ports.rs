//! Platform ports
//!
//! Traits for the native services the call lifecycle drives. They are defined
//! here in the domain layer and implemented in the infrastructure layer
//! (native bindings, no-op stand-ins, the simulated device).

use crate::domain::call::CallType;
use crate::domain::notification::{CallNotification, NotificationChannel};
use crate::domain::shared::result::PlatformResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Notification + foreground service backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Register the notification channel
    async fn create_channel(&self, channel: &NotificationChannel) -> PlatformResult<()>;

    /// Display or update a notification; starts the foreground service when
    /// `notification.foreground_service` is set and no service is running
    async fn display(&self, notification: &CallNotification) -> PlatformResult<()>;

    /// Cancel a displayed notification
    async fn cancel(&self, notification_id: &str) -> PlatformResult<()>;

    /// Stop the foreground service
    async fn stop_foreground_service(&self) -> PlatformResult<()>;
}

/// Screen keep-awake
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WakeLock: Send + Sync {
    async fn activate(&self, tag: &str) -> PlatformResult<()>;

    async fn deactivate(&self, tag: &str) -> PlatformResult<()>;
}

/// Audio session configuration requested for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRoute {
    pub media: CallType,
    pub keep_screen_on: bool,
    pub speaker: bool,
}

impl AudioRoute {
    /// Call defaults: keep the screen on, route to the earpiece
    pub fn for_call(media: CallType) -> Self {
        Self {
            media,
            keep_screen_on: true,
            speaker: false,
        }
    }
}

/// Device audio session (in-call manager)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioSession: Send + Sync {
    async fn start(&self, route: AudioRoute) -> PlatformResult<()>;

    async fn set_keep_screen_on(&self, enabled: bool) -> PlatformResult<()>;

    /// Back to non-call defaults
    async fn stop(&self) -> PlatformResult<()>;
}

/// Callbacks supplied by the call UI layer
#[cfg_attr(test, mockall::automock)]
pub trait CallUiBridge: Send + Sync {
    fn on_return_from_background(&self);

    fn on_toggle_mute(&self);

    fn on_toggle_speaker(&self);

    /// Request termination from the call-control layer
    fn on_end_call(&self);
}

/// Bridge for hosts that do not care about call UI callbacks
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallUiBridge;

impl CallUiBridge for NoopCallUiBridge {
    fn on_return_from_background(&self) {}

    fn on_toggle_mute(&self) {}

    fn on_toggle_speaker(&self) {}

    fn on_end_call(&self) {}
}
