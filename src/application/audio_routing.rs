//! Audio routing adapter

use crate::domain::call::CallType;
use crate::domain::ports::{AudioRoute, AudioSession};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoutingState {
    Idle,
    Configured(CallType),
    /// A start was attempted and failed; the session may be half-configured
    Degraded,
}

/// Puts the device audio session into call mode and back.
///
/// Best effort throughout: failures are logged, and a missing audio module
/// turns every operation into a no-op.
pub struct AudioRoutingAdapter {
    session: Arc<dyn AudioSession>,
    state: RoutingState,
    unavailable: bool,
}

impl AudioRoutingAdapter {
    pub fn new(session: Arc<dyn AudioSession>) -> Self {
        Self {
            session,
            state: RoutingState::Idle,
            unavailable: false,
        }
    }

    pub async fn configure_for_call(&mut self, call_type: CallType) {
        if self.unavailable {
            return;
        }
        if self.state == RoutingState::Configured(call_type) {
            debug!("Audio already configured for {} call", call_type);
            return;
        }

        match self.session.start(AudioRoute::for_call(call_type)).await {
            Ok(()) => {
                info!("Audio session configured for {} call", call_type);
                self.state = RoutingState::Configured(call_type);
            }
            Err(e) if e.is_unavailable() => {
                warn!("Audio session module missing, using default routing: {}", e);
                self.unavailable = true;
            }
            Err(e) => {
                warn!("Failed to configure audio for {} call: {}", call_type, e);
                self.state = RoutingState::Degraded;
            }
        }
    }

    /// Some platforms drop keep-screen-on while backgrounded
    pub async fn restore_after_background(&mut self) {
        if self.unavailable || !matches!(self.state, RoutingState::Configured(_)) {
            debug!("No call audio to restore");
            return;
        }

        match self.session.set_keep_screen_on(true).await {
            Ok(()) => debug!("Keep-screen-on re-asserted after background"),
            Err(e) => warn!("Failed to restore keep-screen-on: {}", e),
        }
    }

    pub async fn teardown(&mut self) {
        if self.unavailable || self.state == RoutingState::Idle {
            return;
        }

        self.state = RoutingState::Idle;
        match self.session.stop().await {
            Ok(()) => info!("Audio session returned to defaults"),
            Err(e) => warn!("Failed to reset audio session: {}", e),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, RoutingState::Configured(_))
    }
}
