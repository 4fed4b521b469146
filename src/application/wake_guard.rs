//! Screen-wake guard

use crate::domain::ports::WakeLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keeps the screen awake for the duration of one call.
///
/// Holds at most one tag. Acquiring while held and releasing while not held
/// are no-ops.
pub struct ScreenWakeGuard {
    wake_lock: Arc<dyn WakeLock>,
    held: Option<String>,
    unavailable: bool,
}

impl ScreenWakeGuard {
    pub fn new(wake_lock: Arc<dyn WakeLock>) -> Self {
        Self {
            wake_lock,
            held: None,
            unavailable: false,
        }
    }

    /// Returns true if the lock is held afterwards
    pub async fn acquire(&mut self, tag: &str) -> bool {
        if self.unavailable {
            debug!("Wake-lock unavailable, skipping acquire");
            return false;
        }
        if let Some(held) = &self.held {
            debug!("Wake-lock '{}' already held", held);
            return true;
        }

        match self.wake_lock.activate(tag).await {
            Ok(()) => {
                info!("Screen wake-lock '{}' acquired", tag);
                self.held = Some(tag.to_string());
                true
            }
            Err(e) if e.is_unavailable() => {
                warn!("Wake-lock module missing, disabling: {}", e);
                self.unavailable = true;
                false
            }
            Err(e) => {
                warn!("Failed to acquire wake-lock '{}', screen may dim: {}", tag, e);
                false
            }
        }
    }

    pub async fn release(&mut self, tag: &str) {
        match self.held.as_deref() {
            None => {
                debug!("Wake-lock '{}' not held, nothing to release", tag);
                return;
            }
            Some(held) if held != tag => {
                debug!("Wake-lock held under '{}', ignoring release of '{}'", held, tag);
                return;
            }
            Some(_) => {}
        }

        self.held = None;
        match self.wake_lock.deactivate(tag).await {
            Ok(()) => info!("Screen wake-lock '{}' released", tag),
            Err(e) => warn!("Failed to release wake-lock '{}': {}", tag, e),
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}
