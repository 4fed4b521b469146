//! Foreground/background observer
//!
//! Tracks the OS-reported application state and reports only the edges
//! that matter to an ongoing call.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application state as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    #[default]
    Active,
    Background,
    /// Transitional (iOS control center, incoming system dialog)
    Inactive,
}

/// Process-wide app lifecycle snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppLifecycleSnapshot {
    pub current: AppState,
    pub was_backgrounded_during_call: bool,
}

/// Edge the coordinator has to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleTransition {
    /// The app left the foreground while a call was active
    EnteredBackgroundDuringCall,
    /// The app came back and the call survived the background period
    ReturnedFromBackground,
}

#[derive(Debug, Default)]
pub struct AppLifecycleObserver {
    snapshot: AppLifecycleSnapshot,
}

impl AppLifecycleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_state(state: AppState) -> Self {
        Self {
            snapshot: AppLifecycleSnapshot {
                current: state,
                was_backgrounded_during_call: false,
            },
        }
    }

    /// Feed an OS app-state change
    pub fn observe(&mut self, next: AppState, call_active: bool) -> Option<LifecycleTransition> {
        let previous = self.snapshot.current;
        if previous == next {
            debug!("App state unchanged ({:?}), ignoring", next);
            return None;
        }
        self.snapshot.current = next;

        match (previous, next) {
            (AppState::Active | AppState::Inactive, AppState::Background) => {
                if call_active {
                    self.snapshot.was_backgrounded_during_call = true;
                    debug!("App backgrounded during active call");
                    Some(LifecycleTransition::EnteredBackgroundDuringCall)
                } else {
                    None
                }
            }
            (_, AppState::Active) if self.snapshot.was_backgrounded_during_call => {
                self.snapshot.was_backgrounded_during_call = false;
                if call_active {
                    debug!("App returned to foreground with call still active");
                    Some(LifecycleTransition::ReturnedFromBackground)
                } else {
                    debug!("App returned to foreground after the call ended");
                    None
                }
            }
            _ => None,
        }
    }

    /// Forget the backgrounded call once it ends, so a later call started
    /// before the app returns is not reported as a return
    pub fn clear_call(&mut self) {
        if self.snapshot.was_backgrounded_during_call {
            debug!("Call ended while backgrounded, clearing flag");
            self.snapshot.was_backgrounded_during_call = false;
        }
    }

    pub fn snapshot(&self) -> AppLifecycleSnapshot {
        self.snapshot
    }

    pub fn is_background(&self) -> bool {
        self.snapshot.current == AppState::Background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_during_call() {
        let mut observer = AppLifecycleObserver::new();

        let transition = observer.observe(AppState::Background, true);
        assert_eq!(transition, Some(LifecycleTransition::EnteredBackgroundDuringCall));
        assert!(observer.snapshot().was_backgrounded_during_call);

        let transition = observer.observe(AppState::Active, true);
        assert_eq!(transition, Some(LifecycleTransition::ReturnedFromBackground));
        assert!(!observer.snapshot().was_backgrounded_during_call);
    }

    #[test]
    fn test_background_without_call() {
        let mut observer = AppLifecycleObserver::new();

        assert_eq!(observer.observe(AppState::Background, false), None);
        assert!(!observer.snapshot().was_backgrounded_during_call);
        assert_eq!(observer.observe(AppState::Active, false), None);
    }

    #[test]
    fn test_ios_style_inactive_hop() {
        let mut observer = AppLifecycleObserver::new();

        assert_eq!(observer.observe(AppState::Inactive, true), None);
        assert_eq!(
            observer.observe(AppState::Background, true),
            Some(LifecycleTransition::EnteredBackgroundDuringCall)
        );
        assert_eq!(observer.observe(AppState::Inactive, true), None);
        assert_eq!(
            observer.observe(AppState::Active, true),
            Some(LifecycleTransition::ReturnedFromBackground)
        );
    }

    #[test]
    fn test_call_ended_while_backgrounded() {
        let mut observer = AppLifecycleObserver::new();

        observer.observe(AppState::Background, true);
        // Call ended in the background; nothing to restore
        assert_eq!(observer.observe(AppState::Active, false), None);
        assert!(!observer.snapshot().was_backgrounded_during_call);
    }

    #[test]
    fn test_next_call_after_cleared_call_is_not_a_return() {
        let mut observer = AppLifecycleObserver::new();

        observer.observe(AppState::Background, true);
        observer.clear_call();
        assert!(!observer.snapshot().was_backgrounded_during_call);
        assert!(observer.is_background());

        // A second call rings before the app comes back
        assert_eq!(observer.observe(AppState::Active, true), None);
    }

    #[test]
    fn test_call_started_while_backgrounded_is_not_a_return() {
        let mut observer = AppLifecycleObserver::new();

        observer.observe(AppState::Background, false);
        assert_eq!(observer.observe(AppState::Active, true), None);
    }

    #[test]
    fn test_repeated_state_is_ignored() {
        let mut observer = AppLifecycleObserver::new();

        observer.observe(AppState::Background, true);
        assert_eq!(observer.observe(AppState::Background, true), None);
        assert!(observer.is_background());
    }
}
