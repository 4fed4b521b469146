//! Shared fixtures for the integration tests
#![allow(dead_code)]

use call_lifecycle::application::CallLifecycleCoordinator;
use call_lifecycle::config::Config;
use call_lifecycle::domain::call::{CallInputs, CallState, CallType};
use call_lifecycle::domain::ports::CallUiBridge;
use call_lifecycle::domain::shared::value_objects::Platform;
use call_lifecycle::infrastructure::platform::{PlatformServices, SimulatedDevice};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Call UI that counts the callbacks it receives
#[derive(Debug, Default)]
pub struct RecordingCallUi {
    pub returns: AtomicUsize,
    pub mutes: AtomicUsize,
    pub speakers: AtomicUsize,
    pub end_calls: AtomicUsize,
}

impl RecordingCallUi {
    pub fn returns(&self) -> usize {
        self.returns.load(Ordering::SeqCst)
    }

    pub fn mutes(&self) -> usize {
        self.mutes.load(Ordering::SeqCst)
    }

    pub fn speakers(&self) -> usize {
        self.speakers.load(Ordering::SeqCst)
    }

    pub fn end_calls(&self) -> usize {
        self.end_calls.load(Ordering::SeqCst)
    }
}

impl CallUiBridge for RecordingCallUi {
    fn on_return_from_background(&self) {
        self.returns.fetch_add(1, Ordering::SeqCst);
    }

    fn on_toggle_mute(&self) {
        self.mutes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_toggle_speaker(&self) {
        self.speakers.fetch_add(1, Ordering::SeqCst);
    }

    fn on_end_call(&self) {
        self.end_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub coordinator: CallLifecycleCoordinator,
    pub device: Arc<SimulatedDevice>,
    pub ui: Arc<RecordingCallUi>,
}

pub fn harness(platform: Platform) -> Harness {
    let config = Config {
        platform,
        ..Config::default()
    };
    let device = Arc::new(SimulatedDevice::new());
    let ui = Arc::new(RecordingCallUi::default());
    let coordinator = CallLifecycleCoordinator::new(
        &config,
        PlatformServices::simulated(device.clone()),
        ui.clone(),
    );

    Harness {
        coordinator,
        device,
        ui,
    }
}

pub fn android() -> Harness {
    harness(Platform::Android)
}

/// Voice call from Ms. Smith in the given state
pub fn smith_call(state: CallState) -> CallInputs {
    CallInputs::new(state)
        .with_call_id("call-smith-1")
        .with_call_type(CallType::Voice)
        .with_caller_name("Ms. Smith")
}

/// Bring the harness to a connected voice call
pub async fn connect(h: &Harness) {
    h.coordinator.apply_inputs(smith_call(CallState::Ringing)).await;
    h.coordinator.apply_inputs(smith_call(CallState::Connected)).await;
}
