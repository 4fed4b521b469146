//! Call notification presenter
//!
//! Renders the call notification and submits it to the notification backend,
//! owning the Android foreground-service handle. Performs no throttling of
//! its own; the coordinator decides when to present.

use crate::domain::call::{CallSessionContext, CallState};
use crate::domain::notification::{
    CallNotification, NotificationChannel, NotificationRenderer, ServiceTypePolicy,
};
use crate::domain::ports::NotificationBackend;
use crate::domain::shared::error::PlatformError;
use crate::domain::shared::value_objects::Platform;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Foreground service bookkeeping, one per service run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundServiceHandle {
    pub active: bool,
    pub channel_registered: bool,
    /// A display was attempted since the last stop
    pub dirty: bool,
}

/// Result of a present call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Nothing submitted: no foreground service on this platform, backend
    /// missing, or nothing to show for this state
    Skipped,
    Displayed { started_service: bool },
    /// Displayed after dropping the explicit service types
    DisplayedReduced { started_service: bool },
    Failed,
}

impl PresentOutcome {
    pub fn is_displayed(&self) -> bool {
        matches!(
            self,
            PresentOutcome::Displayed { .. } | PresentOutcome::DisplayedReduced { .. }
        )
    }

    pub fn started_service(&self) -> bool {
        matches!(
            self,
            PresentOutcome::Displayed { started_service: true }
                | PresentOutcome::DisplayedReduced { started_service: true }
        )
    }
}

pub struct CallNotificationPresenter {
    backend: Arc<dyn NotificationBackend>,
    renderer: NotificationRenderer,
    channel: NotificationChannel,
    platform: Platform,
    handle: ForegroundServiceHandle,
    /// Switched to `Reduced` after the manifest rejected the full type set
    service_types: ServiceTypePolicy,
    unavailable: bool,
}

impl CallNotificationPresenter {
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        renderer: NotificationRenderer,
        channel: NotificationChannel,
        platform: Platform,
    ) -> Self {
        Self {
            backend,
            renderer,
            channel,
            platform,
            handle: ForegroundServiceHandle::default(),
            service_types: ServiceTypePolicy::Full,
            unavailable: false,
        }
    }

    fn enabled(&self) -> bool {
        self.platform.supports_foreground_service() && !self.unavailable
    }

    /// Render for `state` and start or update the foreground notification
    pub async fn present(&mut self, state: CallState, session: &CallSessionContext) -> PresentOutcome {
        if !self.enabled() {
            return PresentOutcome::Skipped;
        }
        let Some(notification) = self.renderer.render(state, session, self.service_types) else {
            debug!("No call notification for state {}", state);
            return PresentOutcome::Skipped;
        };
        if !self.ensure_channel().await {
            return PresentOutcome::Failed;
        }

        let starting = !self.handle.active;
        self.handle.dirty = true;

        match self.submit(&notification).await {
            Ok(()) => {
                self.mark_displayed(starting, &notification);
                PresentOutcome::Displayed { started_service: starting }
            }
            Err(e) if e.is_service_type_mismatch() => {
                self.retry_reduced(state, session, starting, e).await
            }
            Err(e) => {
                self.on_backend_error("display call notification", e);
                PresentOutcome::Failed
            }
        }
    }

    /// Redisplay without explicit service types. The reduced payload is
    /// rendered again from the inputs rather than patched from the failed one.
    async fn retry_reduced(
        &mut self,
        state: CallState,
        session: &CallSessionContext,
        starting: bool,
        cause: PlatformError,
    ) -> PresentOutcome {
        warn!(
            "Foreground service types rejected by the manifest, retrying without them: {}",
            cause
        );
        counter!("call_lifecycle_service_type_retries_total").increment(1);
        self.service_types = ServiceTypePolicy::Reduced;

        let Some(reduced) = self.renderer.render(state, session, ServiceTypePolicy::Reduced) else {
            return PresentOutcome::Skipped;
        };

        match self.submit(&reduced).await {
            Ok(()) => {
                self.mark_displayed(starting, &reduced);
                PresentOutcome::DisplayedReduced { started_service: starting }
            }
            Err(e) => {
                error!(
                    "CRITICAL: call notification failed even without service types; \
                     check the foregroundServiceType declaration in AndroidManifest.xml: {}",
                    e
                );
                counter!("call_lifecycle_notification_failures_total").increment(1);
                PresentOutcome::Failed
            }
        }
    }

    async fn submit(&self, notification: &CallNotification) -> Result<(), PlatformError> {
        counter!("call_lifecycle_notification_displays_total").increment(1);
        self.backend.display(notification).await
    }

    fn mark_displayed(&mut self, starting: bool, notification: &CallNotification) {
        self.handle.active = true;
        if starting {
            info!("Call foreground service started: {}", notification.title);
        } else {
            debug!("Call notification updated: {}", notification.title);
        }
    }

    async fn ensure_channel(&mut self) -> bool {
        if self.handle.channel_registered {
            return true;
        }

        match self.backend.create_channel(&self.channel).await {
            Ok(()) => {
                info!("Notification channel '{}' created", self.channel.id);
                self.handle.channel_registered = true;
                true
            }
            Err(e) => {
                self.on_backend_error("create notification channel", e);
                false
            }
        }
    }

    fn on_backend_error(&mut self, operation: &str, e: PlatformError) {
        counter!("call_lifecycle_notification_failures_total").increment(1);
        if e.is_unavailable() {
            warn!("Notification backend missing, disabling call notifications: {}", e);
            self.unavailable = true;
        } else {
            warn!("Failed to {}: {}", operation, e);
        }
    }

    /// Cancel the notification and stop the service. No-op when already stopped.
    pub async fn stop_foreground_service(&mut self) {
        if !self.handle.active && !self.handle.dirty {
            debug!("Foreground service not running, nothing to stop");
            return;
        }
        self.handle.active = false;
        self.handle.dirty = false;

        if self.unavailable {
            return;
        }

        let notification_id = self.renderer.notification_id().to_string();
        if let Err(e) = self.backend.cancel(&notification_id).await {
            warn!("Failed to cancel call notification: {}", e);
        }
        match self.backend.stop_foreground_service().await {
            Ok(()) => info!("Call foreground service stopped"),
            Err(e) => warn!("Failed to stop foreground service: {}", e),
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.active
    }

    pub fn handle(&self) -> ForegroundServiceHandle {
        self.handle
    }
}
