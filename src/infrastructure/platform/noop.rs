//! No-op stand-ins for platform modules missing on this build

use crate::domain::notification::{CallNotification, NotificationChannel};
use crate::domain::ports::{AudioRoute, AudioSession, NotificationBackend, WakeLock};
use crate::domain::shared::error::PlatformError;
use crate::domain::shared::result::PlatformResult;
use async_trait::async_trait;

/// Reports itself unavailable on first use so the presenter goes inert
/// instead of believing a foreground service is running
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationBackend;

const NO_NOTIFICATIONS: &str = "notification module not available";

#[async_trait]
impl NotificationBackend for NoopNotificationBackend {
    async fn create_channel(&self, _channel: &NotificationChannel) -> PlatformResult<()> {
        Err(PlatformError::Unavailable(NO_NOTIFICATIONS.to_string()))
    }

    async fn display(&self, _notification: &CallNotification) -> PlatformResult<()> {
        Err(PlatformError::Unavailable(NO_NOTIFICATIONS.to_string()))
    }

    async fn cancel(&self, _notification_id: &str) -> PlatformResult<()> {
        Ok(())
    }

    async fn stop_foreground_service(&self) -> PlatformResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWakeLock;

#[async_trait]
impl WakeLock for NoopWakeLock {
    async fn activate(&self, _tag: &str) -> PlatformResult<()> {
        Ok(())
    }

    async fn deactivate(&self, _tag: &str) -> PlatformResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudioSession;

#[async_trait]
impl AudioSession for NoopAudioSession {
    async fn start(&self, _route: AudioRoute) -> PlatformResult<()> {
        Ok(())
    }

    async fn set_keep_screen_on(&self, _enabled: bool) -> PlatformResult<()> {
        Ok(())
    }

    async fn stop(&self) -> PlatformResult<()> {
        Ok(())
    }
}
