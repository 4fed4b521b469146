//! Call lifecycle coordinator
//!
//! Reconciles three independently changing inputs into platform side effects:
//! the logical call state (from the call UI), the app's foreground/background
//! state (from the OS), and the OS view of the call (foreground service and
//! notification). Side effects are the screen wake-lock, audio routing and the
//! actionable call notification.
//!
//! Every public operation runs under a single async mutex, so operations are
//! applied one at a time in arrival order. Platform failures never propagate
//! out of the coordinator; they are logged and the call carries on with
//! reduced capabilities.
//!
//! ```
//! use call_lifecycle::application::CallLifecycleCoordinator;
//! use call_lifecycle::config::Config;
//! use call_lifecycle::domain::call::{CallInputs, CallState};
//! use call_lifecycle::domain::ports::NoopCallUiBridge;
//! use call_lifecycle::infrastructure::platform::{PlatformServices, SimulatedDevice};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let device = Arc::new(SimulatedDevice::new());
//! let coordinator = CallLifecycleCoordinator::new(
//!     &Config::android(),
//!     PlatformServices::simulated(device.clone()),
//!     Arc::new(NoopCallUiBridge),
//! );
//!
//! coordinator
//!     .apply_inputs(CallInputs::new(CallState::Ringing).with_caller_name("Ms. Smith"))
//!     .await;
//! assert!(device.is_service_running());
//!
//! coordinator.on_call_state_changed(CallState::Ended).await;
//! assert!(!device.is_service_running());
//! # });
//! ```

use crate::application::audio_routing::AudioRoutingAdapter;
use crate::application::presenter::CallNotificationPresenter;
use crate::application::wake_guard::ScreenWakeGuard;
use crate::config::Config;
use crate::domain::call::{
    CallInputs, CallLifecycleEvent, CallSessionContext, CallState, LifecycleEventKind,
};
use crate::domain::lifecycle::{AppLifecycleObserver, AppLifecycleSnapshot, AppState, LifecycleTransition};
use crate::domain::notification::{NotificationActionId, NotificationRenderer};
use crate::domain::ports::CallUiBridge;
use crate::infrastructure::platform::PlatformServices;
use crate::infrastructure::timer::DebounceTimer;
use chrono::Utc;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Which UI callback to run once the lock is released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeCall {
    ToggleMute,
    ToggleSpeaker,
    EndCall,
    ReturnFromBackground,
}

pub struct CallLifecycleCoordinator {
    inner: Arc<Mutex<CoordinatorInner>>,
    bridge: Arc<dyn CallUiBridge>,
}

struct CoordinatorInner {
    call_state: CallState,
    /// Latest details pushed by the call UI, used to open the next session
    inputs: CallInputs,
    session: Option<CallSessionContext>,
    observer: AppLifecycleObserver,
    presenter: CallNotificationPresenter,
    wake_guard: ScreenWakeGuard,
    audio: AudioRoutingAdapter,
    debounce: DebounceTimer,
    wake_tag: String,
    events: Vec<CallLifecycleEvent>,
    disposed: bool,
    /// Handed to debounced tasks so they never keep the coordinator alive
    self_ref: Weak<Mutex<CoordinatorInner>>,
}

impl CallLifecycleCoordinator {
    pub fn new(config: &Config, services: PlatformServices, bridge: Arc<dyn CallUiBridge>) -> Self {
        let renderer = NotificationRenderer::new(
            config.notification.notification_id.clone(),
            config.notification.channel_id.clone(),
        );
        let presenter = CallNotificationPresenter::new(
            services.notifications,
            renderer,
            config.notification.channel(),
            config.platform,
        );

        let inner = Arc::new_cyclic(|self_ref| {
            Mutex::new(CoordinatorInner {
                call_state: CallState::Idle,
                inputs: CallInputs::default(),
                session: None,
                observer: AppLifecycleObserver::new(),
                presenter,
                wake_guard: ScreenWakeGuard::new(services.wake_lock),
                audio: AudioRoutingAdapter::new(services.audio),
                debounce: DebounceTimer::new(config.notification.debounce_window()),
                wake_tag: config.wake_lock.tag.clone(),
                events: Vec::new(),
                disposed: false,
                self_ref: self_ref.clone(),
            })
        });

        info!(
            "Call lifecycle coordinator ready (platform: {}, debounce: {}ms)",
            config.platform, config.notification.debounce_ms
        );
        Self { inner, bridge }
    }

    /// Report a new logical call state
    pub async fn on_call_state_changed(&self, state: CallState) {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            debug!("Coordinator disposed, ignoring call state {}", state);
            return;
        }
        inner.transition(state).await;
    }

    /// Push the call UI's current view of the call
    pub async fn apply_inputs(&self, inputs: CallInputs) {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            debug!("Coordinator disposed, ignoring call inputs");
            return;
        }

        let (visible_change, type_change) = match inner.session.as_mut() {
            Some(session) => {
                let previous_type = session.call_type();
                let visible_change = session.update_from(&inputs);
                (visible_change, session.call_type() != previous_type)
            }
            None => (false, false),
        };
        let state = inputs.call_state;
        let state_changed = state != inner.call_state;
        inner.inputs = inputs;

        inner.transition(state).await;

        if !state_changed && inner.call_state.is_active() {
            // Voice upgraded to video (or back) mid-call
            if type_change {
                let call_type = inner.inputs.call_type;
                info!("Call type changed to {}, reconfiguring audio", call_type);
                inner.audio.configure_for_call(call_type).await;
            }
            if visible_change {
                inner.schedule_refresh();
            }
        }
    }

    /// Mute toggle requested from the notification. The call UI is told to
    /// apply it through `on_toggle_mute`. Toggles made in the call UI itself
    /// arrive through `apply_inputs` and are not echoed back.
    pub async fn toggle_mute(&self) {
        let applied = {
            let mut inner = self.inner.lock().await;
            match inner.active_session_mut().map(CallSessionContext::toggle_audio) {
                Some(audio_enabled) => {
                    info!("Mute toggled (audio enabled: {})", audio_enabled);
                    inner.inputs.is_audio_enabled = audio_enabled;
                    inner.schedule_refresh();
                    true
                }
                None => false,
            }
        };

        if applied {
            self.invoke(BridgeCall::ToggleMute);
        } else {
            debug!("No active call, ignoring mute toggle");
        }
    }

    /// Speaker counterpart of [`toggle_mute`](Self::toggle_mute)
    pub async fn toggle_speaker(&self) {
        let applied = {
            let mut inner = self.inner.lock().await;
            match inner.active_session_mut().map(CallSessionContext::toggle_speaker) {
                Some(speaker_enabled) => {
                    info!("Speaker toggled (speaker enabled: {})", speaker_enabled);
                    inner.inputs.is_speaker_enabled = speaker_enabled;
                    inner.schedule_refresh();
                    true
                }
                None => false,
            }
        };

        if applied {
            self.invoke(BridgeCall::ToggleSpeaker);
        } else {
            debug!("No active call, ignoring speaker toggle");
        }
    }

    /// Ask the call-control layer to hang up; the resulting `Ended` state
    /// arrives later through `on_call_state_changed`
    pub async fn end_call(&self) {
        let active = {
            let inner = self.inner.lock().await;
            !inner.disposed && inner.call_state.is_active()
        };

        if active {
            info!("End call requested");
            self.invoke(BridgeCall::EndCall);
        } else {
            debug!("No active call, ignoring end call request");
        }
    }

    /// Dispatch an action id coming back from a notification tap.
    /// Returns false for ids this coordinator does not own.
    pub async fn handle_notification_action(&self, action_id: &str) -> bool {
        let action = match action_id.parse::<NotificationActionId>() {
            Ok(action) => action,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };

        debug!("Notification action '{}' pressed", action);
        match action {
            NotificationActionId::ToggleMute => self.toggle_mute().await,
            NotificationActionId::ToggleSpeaker => self.toggle_speaker().await,
            NotificationActionId::EndCall => self.end_call().await,
        }
        true
    }

    /// Report an OS app-state change
    pub async fn on_app_lifecycle_changed(&self, state: AppState) {
        let returned = {
            let mut inner = self.inner.lock().await;
            if inner.disposed {
                return;
            }

            let call_active = inner.call_state.is_active();
            match inner.observer.observe(state, call_active) {
                Some(LifecycleTransition::EnteredBackgroundDuringCall) => {
                    inner.enter_background().await;
                    false
                }
                Some(LifecycleTransition::ReturnedFromBackground) => {
                    info!("Returned to foreground during {} call", inner.call_state);
                    inner.audio.restore_after_background().await;
                    inner.record(LifecycleEventKind::ReturnedFromBackground);
                    true
                }
                None => false,
            }
        };

        if returned {
            self.invoke(BridgeCall::ReturnFromBackground);
        }
    }

    /// Tear everything down and stop accepting input. Pending refreshes are
    /// cancelled and never fire.
    pub async fn dispose(&self) {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            return;
        }

        let final_state = inner.call_state;
        inner.teardown(final_state).await;
        inner.call_state = CallState::Idle;
        inner.disposed = true;
        info!("Call lifecycle coordinator disposed");
    }

    fn invoke(&self, call: BridgeCall) {
        match call {
            BridgeCall::ToggleMute => self.bridge.on_toggle_mute(),
            BridgeCall::ToggleSpeaker => self.bridge.on_toggle_speaker(),
            BridgeCall::EndCall => self.bridge.on_end_call(),
            BridgeCall::ReturnFromBackground => self.bridge.on_return_from_background(),
        }
    }

    // Read accessors

    pub async fn call_state(&self) -> CallState {
        self.inner.lock().await.call_state
    }

    pub async fn session(&self) -> Option<CallSessionContext> {
        self.inner.lock().await.session.clone()
    }

    pub async fn app_snapshot(&self) -> AppLifecycleSnapshot {
        self.inner.lock().await.observer.snapshot()
    }

    pub async fn is_service_active(&self) -> bool {
        self.inner.lock().await.presenter.is_active()
    }

    pub async fn is_wake_held(&self) -> bool {
        self.inner.lock().await.wake_guard.is_held()
    }

    pub async fn is_refresh_pending(&self) -> bool {
        self.inner.lock().await.debounce.is_pending()
    }

    /// Drain recorded lifecycle events
    pub async fn take_events(&self) -> Vec<CallLifecycleEvent> {
        std::mem::take(&mut self.inner.lock().await.events)
    }
}

impl CoordinatorInner {
    async fn transition(&mut self, next: CallState) {
        let previous = self.call_state;
        if previous == next {
            debug!("Call state {} repeated, nothing to do", next);
            return;
        }
        self.call_state = next;
        info!("Call state {} -> {}", previous, next);

        if next.is_active() {
            self.ensure_session(next);
            self.wake_guard.acquire(&self.wake_tag).await;

            let call_type = self
                .session
                .as_ref()
                .map(CallSessionContext::call_type)
                .unwrap_or(self.inputs.call_type);
            self.audio.configure_for_call(call_type).await;

            // The immediate render already reflects the latest inputs
            self.debounce.cancel();
            self.present(false).await;
        } else {
            self.teardown(next).await;
        }
    }

    fn ensure_session(&mut self, state: CallState) {
        if self.session.is_some() {
            return;
        }

        let session = CallSessionContext::from_inputs(&self.inputs);
        info!(
            "Call session started ({} call, id: {})",
            session.call_type(),
            session
                .call_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unassigned".to_string())
        );
        let call_type = session.call_type();
        self.session = Some(session);
        self.record(LifecycleEventKind::SessionStarted { call_type, state });
    }

    async fn enter_background(&mut self) {
        let service_was_active = self.presenter.is_active();
        if service_was_active {
            info!("Backgrounded during call, forcing notification refresh");
        } else {
            info!("Backgrounded during call, starting foreground service");
        }

        // Bypass the debounce: the process may be suspended right after this
        self.debounce.cancel();
        self.present(true).await;

        let service_started = !service_was_active && self.presenter.is_active();
        self.record(LifecycleEventKind::BackgroundEntered { service_started });
    }

    async fn present(&mut self, forced: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let outcome = self.presenter.present(self.call_state, session).await;
        if outcome.is_displayed() {
            self.record(LifecycleEventKind::NotificationPresented {
                state: self.call_state,
                forced,
            });
        }
    }

    /// Coalesce refreshes inside the debounce window; last write wins since
    /// the task renders from whatever state exists when it fires
    fn schedule_refresh(&mut self) {
        let self_ref = self.self_ref.clone();
        self.debounce.schedule(async move {
            let Some(shared) = self_ref.upgrade() else {
                return;
            };
            let mut inner = shared.lock().await;
            inner.debounce.mark_fired();
            if inner.disposed || !inner.call_state.is_active() {
                return;
            }
            debug!("Debounced notification refresh");
            inner.present(false).await;
        });
    }

    async fn teardown(&mut self, final_state: CallState) {
        self.debounce.cancel();
        self.presenter.stop_foreground_service().await;
        self.wake_guard.release(&self.wake_tag).await;
        self.audio.teardown().await;
        self.observer.clear_call();

        if let Some(session) = self.session.take() {
            let duration_seconds = (Utc::now() - *session.started_at()).num_seconds();
            info!("Call session closed ({}, {}s)", final_state, duration_seconds);
            self.events.push(CallLifecycleEvent::new(
                session.call_id().cloned(),
                LifecycleEventKind::SessionEnded {
                    final_state,
                    duration_seconds,
                },
            ));
        }
    }

    fn active_session_mut(&mut self) -> Option<&mut CallSessionContext> {
        if self.disposed || !self.call_state.is_active() {
            return None;
        }
        self.session.as_mut()
    }

    fn record(&mut self, kind: LifecycleEventKind) {
        let call_id = self.session.as_ref().and_then(|s| s.call_id().cloned());
        self.events.push(CallLifecycleEvent::new(call_id, kind));
    }
}
