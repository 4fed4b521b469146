//! Platform adapters and the fallible initialization step
//!
//! Native modules may be missing depending on the build. Each port is
//! resolved once at startup: a working adapter, or the no-op stand-in.

pub mod noop;
pub mod simulated;

pub use noop::{NoopAudioSession, NoopNotificationBackend, NoopWakeLock};
pub use simulated::{DeviceCall, DeviceOp, SimulatedDevice};

use crate::domain::ports::{AudioSession, NotificationBackend, WakeLock};
use crate::domain::shared::result::PlatformResult;
use std::sync::Arc;
use tracing::warn;

/// The set of platform ports a coordinator drives
#[derive(Clone)]
pub struct PlatformServices {
    pub notifications: Arc<dyn NotificationBackend>,
    pub wake_lock: Arc<dyn WakeLock>,
    pub audio: Arc<dyn AudioSession>,
}

impl PlatformServices {
    pub fn new(
        notifications: Arc<dyn NotificationBackend>,
        wake_lock: Arc<dyn WakeLock>,
        audio: Arc<dyn AudioSession>,
    ) -> Self {
        Self {
            notifications,
            wake_lock,
            audio,
        }
    }

    /// Every capability absent
    pub fn noop() -> Self {
        Self::new(
            Arc::new(NoopNotificationBackend),
            Arc::new(NoopWakeLock),
            Arc::new(NoopAudioSession),
        )
    }

    /// One simulated device backing all three ports
    pub fn simulated(device: Arc<SimulatedDevice>) -> Self {
        Self::new(device.clone(), device.clone(), device)
    }

    /// Take the outcome of each module's initialization and substitute the
    /// no-op stand-in for any that failed.
    pub fn resolve(
        notifications: PlatformResult<Arc<dyn NotificationBackend>>,
        wake_lock: PlatformResult<Arc<dyn WakeLock>>,
        audio: PlatformResult<Arc<dyn AudioSession>>,
    ) -> Self {
        let notifications = notifications.unwrap_or_else(|e| {
            warn!("Notification backend unavailable, call notifications disabled: {}", e);
            Arc::new(NoopNotificationBackend)
        });
        let wake_lock = wake_lock.unwrap_or_else(|e| {
            warn!("Wake-lock unavailable, screen may dim during calls: {}", e);
            Arc::new(NoopWakeLock)
        });
        let audio = audio.unwrap_or_else(|e| {
            warn!("Audio session module unavailable, using default routing: {}", e);
            Arc::new(NoopAudioSession)
        });

        Self::new(notifications, wake_lock, audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::error::PlatformError;

    #[tokio::test]
    async fn test_resolve_keeps_working_adapters() {
        let device = Arc::new(SimulatedDevice::new());
        let services = PlatformServices::resolve(
            Ok(device.clone() as Arc<dyn NotificationBackend>),
            Err(PlatformError::Unavailable("expo-keep-awake".to_string())),
            Ok(device.clone() as Arc<dyn AudioSession>),
        );

        services.wake_lock.activate("active-call").await.unwrap();
        assert!(!device.is_wake_held());

        services
            .audio
            .start(crate::domain::ports::AudioRoute::for_call(crate::domain::call::CallType::Voice))
            .await
            .unwrap();
        assert!(device.audio_route().is_some());
    }
}
