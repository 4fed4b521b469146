//! Simulated device
//!
//! In-memory implementation of every platform port. It records each call,
//! models whether the OS considers the foreground service running, and can be
//! told to fail specific operations. The demo binary and the integration
//! tests drive the coordinator against it.

use crate::domain::notification::{CallNotification, NotificationChannel};
use crate::domain::ports::{AudioRoute, AudioSession, NotificationBackend, WakeLock};
use crate::domain::shared::error::PlatformError;
use crate::domain::shared::result::PlatformResult;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Operation names used for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOp {
    CreateChannel,
    Display,
    Cancel,
    StopForegroundService,
    WakeActivate,
    WakeDeactivate,
    AudioStart,
    KeepScreenOn,
    AudioStop,
}

/// One recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateChannel(NotificationChannel),
    Display(CallNotification),
    Cancel(String),
    StopForegroundService,
    WakeActivate(String),
    WakeDeactivate(String),
    AudioStart(AudioRoute),
    KeepScreenOn(bool),
    AudioStop,
}

#[derive(Debug, Default)]
struct DeviceState {
    calls: Vec<DeviceCall>,
    failures: HashMap<DeviceOp, VecDeque<PlatformError>>,
    channels: HashSet<String>,
    visible_notifications: HashSet<String>,
    service_running: bool,
    service_starts: usize,
    wake_tags: HashSet<String>,
    audio_route: Option<AudioRoute>,
    keep_screen_on: bool,
}

impl DeviceState {
    fn record(&mut self, op: DeviceOp, call: DeviceCall) -> PlatformResult<()> {
        self.calls.push(call);
        match self.failures.get_mut(&op).and_then(|queue| queue.pop_front()) {
            Some(err) => {
                debug!("Simulated device failing {:?}: {}", op, err);
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedDevice {
    state: Mutex<DeviceState>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `op` fail with `error`. Queued failures are consumed in order.
    pub fn fail_next(&self, op: DeviceOp, error: PlatformError) {
        self.state().failures.entry(op).or_default().push_back(error);
    }

    /// Every recorded call, in order
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Every display attempt, including failed ones
    pub fn displays(&self) -> Vec<CallNotification> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Display(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn display_count(&self) -> usize {
        self.displays().len()
    }

    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.state().calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn channel_creations(&self) -> usize {
        self.count(|call| matches!(call, DeviceCall::CreateChannel(_)))
    }

    pub fn service_starts(&self) -> usize {
        self.state().service_starts
    }

    pub fn is_service_running(&self) -> bool {
        self.state().service_running
    }

    pub fn is_notification_visible(&self, notification_id: &str) -> bool {
        self.state().visible_notifications.contains(notification_id)
    }

    pub fn is_wake_held(&self) -> bool {
        !self.state().wake_tags.is_empty()
    }

    pub fn audio_route(&self) -> Option<AudioRoute> {
        self.state().audio_route
    }

    pub fn is_keep_screen_on(&self) -> bool {
        self.state().keep_screen_on
    }
}

#[async_trait]
impl NotificationBackend for SimulatedDevice {
    async fn create_channel(&self, channel: &NotificationChannel) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::CreateChannel, DeviceCall::CreateChannel(channel.clone()))?;
        state.channels.insert(channel.id.clone());
        info!("Notification channel '{}' registered", channel.id);
        Ok(())
    }

    async fn display(&self, notification: &CallNotification) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::Display, DeviceCall::Display(notification.clone()))?;

        if !state.channels.contains(&notification.channel_id) {
            return Err(PlatformError::Platform(format!(
                "Channel {} does not exist",
                notification.channel_id
            )));
        }

        if notification.foreground_service && !state.service_running {
            state.service_running = true;
            state.service_starts += 1;
            info!("Foreground service started ({:?})", notification.service_types);
        }
        state.visible_notifications.insert(notification.id.clone());

        match serde_json::to_string(notification) {
            Ok(payload) => debug!(%payload, "Notification displayed"),
            Err(e) => debug!("Notification displayed (payload not serializable: {})", e),
        }
        Ok(())
    }

    async fn cancel(&self, notification_id: &str) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::Cancel, DeviceCall::Cancel(notification_id.to_string()))?;
        state.visible_notifications.remove(notification_id);
        debug!("Notification {} cancelled", notification_id);
        Ok(())
    }

    async fn stop_foreground_service(&self) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::StopForegroundService, DeviceCall::StopForegroundService)?;
        if state.service_running {
            state.service_running = false;
            info!("Foreground service stopped");
        }
        Ok(())
    }
}

#[async_trait]
impl WakeLock for SimulatedDevice {
    async fn activate(&self, tag: &str) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::WakeActivate, DeviceCall::WakeActivate(tag.to_string()))?;
        state.wake_tags.insert(tag.to_string());
        Ok(())
    }

    async fn deactivate(&self, tag: &str) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::WakeDeactivate, DeviceCall::WakeDeactivate(tag.to_string()))?;
        state.wake_tags.remove(tag);
        Ok(())
    }
}

#[async_trait]
impl AudioSession for SimulatedDevice {
    async fn start(&self, route: AudioRoute) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::AudioStart, DeviceCall::AudioStart(route))?;
        state.audio_route = Some(route);
        state.keep_screen_on = route.keep_screen_on;
        Ok(())
    }

    async fn set_keep_screen_on(&self, enabled: bool) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::KeepScreenOn, DeviceCall::KeepScreenOn(enabled))?;
        state.keep_screen_on = enabled;
        Ok(())
    }

    async fn stop(&self) -> PlatformResult<()> {
        let mut state = self.state();
        state.record(DeviceOp::AudioStop, DeviceCall::AudioStop)?;
        state.audio_route = None;
        state.keep_screen_on = false;
        Ok(())
    }
}
