//! Background persistence and notification refresh tests
//!
//! Timers run on a paused clock so debounce windows are deterministic.

mod common;

use call_lifecycle::domain::call::{CallState, LifecycleEventKind};
use call_lifecycle::domain::lifecycle::AppState;
use call_lifecycle::domain::shared::error::PlatformError;
use call_lifecycle::domain::shared::value_objects::Platform;
use call_lifecycle::infrastructure::platform::{DeviceCall, DeviceOp};
use common::{android, connect, harness, smith_call};
use std::time::Duration;
use tokio::time::sleep;

fn background_events(kinds: &[LifecycleEventKind]) -> Vec<bool> {
    kinds
        .iter()
        .filter_map(|k| match k {
            LifecycleEventKind::BackgroundEntered { service_started } => Some(*service_started),
            _ => None,
        })
        .collect()
}

async fn event_kinds(h: &common::Harness) -> Vec<LifecycleEventKind> {
    h.coordinator
        .take_events()
        .await
        .into_iter()
        .map(|e| e.kind)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_scenario_background_refreshes_running_service() {
    let h = android();
    connect(&h).await;
    h.device.clear_calls();
    h.coordinator.take_events().await;

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;

    assert_eq!(h.device.display_count(), 1);
    assert_eq!(h.device.service_starts(), 1);
    assert!(h.device.is_service_running());

    let kinds = event_kinds(&h).await;
    assert!(kinds.contains(&LifecycleEventKind::NotificationPresented {
        state: CallState::Connected,
        forced: true,
    }));
    assert_eq!(background_events(&kinds), vec![false]);

    let snapshot = h.coordinator.app_snapshot().await;
    assert_eq!(snapshot.current, AppState::Background);
    assert!(snapshot.was_backgrounded_during_call);
}

#[tokio::test(start_paused = true)]
async fn test_background_starts_service_after_failed_displays() {
    let h = android();
    for _ in 0..2 {
        h.device.fail_next(
            DeviceOp::Display,
            PlatformError::Platform("notification manager busy".to_string()),
        );
    }

    connect(&h).await;
    assert!(!h.device.is_service_running());
    h.coordinator.take_events().await;

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;

    assert!(h.device.is_service_running());
    assert_eq!(h.device.service_starts(), 1);
    assert_eq!(background_events(&event_kinds(&h).await), vec![true]);
}

#[tokio::test(start_paused = true)]
async fn test_scenario_rapid_toggles_coalesce_into_one_refresh() {
    let h = android();
    connect(&h).await;
    h.device.clear_calls();

    for _ in 0..5 {
        h.coordinator.toggle_mute().await;
        sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(h.device.display_count(), 0);
    assert!(h.coordinator.is_refresh_pending().await);

    sleep(Duration::from_millis(300)).await;

    let displays = h.device.displays();
    assert_eq!(displays.len(), 1);
    assert_eq!(displays[0].title, "📞 Voice call - Muted");
    assert_eq!(displays[0].actions[0].title, "Unmute");
    assert_eq!(h.ui.mutes(), 5);
    assert!(!h.coordinator.is_refresh_pending().await);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_refresh_reflects_latest_toggles() {
    let h = android();
    connect(&h).await;
    h.device.clear_calls();

    h.coordinator.handle_notification_action("toggle_mute").await;
    sleep(Duration::from_millis(50)).await;
    h.coordinator.handle_notification_action("toggle_speaker").await;
    sleep(Duration::from_millis(50)).await;
    h.coordinator.handle_notification_action("toggle_mute").await;

    sleep(Duration::from_millis(250)).await;

    let displays = h.device.displays();
    assert_eq!(displays.len(), 1);
    assert_eq!(displays[0].title, "📞 Voice call - Active");
    let titles: Vec<&str> = displays[0].actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Mute", "Earpiece", "End Call"]);
}

#[tokio::test(start_paused = true)]
async fn test_caller_name_change_refreshes_after_window() {
    let h = android();
    connect(&h).await;
    h.device.clear_calls();

    h.coordinator
        .apply_inputs(smith_call(CallState::Connected).with_caller_name("Mr. Jones"))
        .await;
    assert_eq!(h.device.display_count(), 0);

    sleep(Duration::from_millis(250)).await;

    let displays = h.device.displays();
    assert_eq!(displays.len(), 1);
    assert_eq!(displays[0].body, "With Mr. Jones");
}

#[tokio::test(start_paused = true)]
async fn test_background_overrides_pending_refresh() {
    let h = android();
    connect(&h).await;
    h.device.clear_calls();

    h.coordinator.toggle_mute().await;
    assert!(h.coordinator.is_refresh_pending().await);

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;

    let displays = h.device.displays();
    assert_eq!(displays.len(), 1);
    assert_eq!(displays[0].title, "📞 Voice call - Muted");
    assert!(!h.coordinator.is_refresh_pending().await);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(h.device.display_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_state_change_supersedes_pending_refresh() {
    let h = android();
    h.coordinator.apply_inputs(smith_call(CallState::Ringing)).await;
    h.coordinator.toggle_speaker().await;
    h.device.clear_calls();

    h.coordinator.apply_inputs(smith_call(CallState::Connected)).await;
    assert_eq!(h.device.display_count(), 1);
    assert!(!h.coordinator.is_refresh_pending().await);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(h.device.display_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_call_end_cancels_pending_refresh() {
    let h = android();
    connect(&h).await;

    h.coordinator.toggle_mute().await;
    h.coordinator.on_call_state_changed(CallState::Ended).await;
    h.device.clear_calls();

    sleep(Duration::from_millis(500)).await;
    assert!(h.device.calls().is_empty());
    assert!(!h.device.is_notification_visible("active-call"));
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_refresh_and_ignores_later_input() {
    let h = android();
    connect(&h).await;
    h.coordinator.toggle_mute().await;

    h.coordinator.dispose().await;
    assert!(!h.device.is_service_running());
    assert!(!h.device.is_wake_held());
    assert!(h.device.audio_route().is_none());
    h.device.clear_calls();

    sleep(Duration::from_millis(500)).await;
    h.coordinator.on_call_state_changed(CallState::Ringing).await;
    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;
    h.coordinator.toggle_mute().await;
    h.coordinator.dispose().await;

    assert!(h.device.calls().is_empty());
    assert_eq!(h.coordinator.call_state().await, CallState::Idle);
    assert_eq!(h.ui.mutes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_return_from_background_restores_call_ui() {
    let h = android();
    connect(&h).await;

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;
    h.device.clear_calls();
    h.coordinator.on_app_lifecycle_changed(AppState::Active).await;

    assert_eq!(h.ui.returns(), 1);
    assert_eq!(h.device.calls(), vec![DeviceCall::KeepScreenOn(true)]);
    assert!(h.device.is_keep_screen_on());
    assert!(event_kinds(&h)
        .await
        .contains(&LifecycleEventKind::ReturnedFromBackground));
    assert!(!h.coordinator.app_snapshot().await.was_backgrounded_during_call);
}

#[tokio::test(start_paused = true)]
async fn test_no_return_callback_after_call_ended_in_background() {
    let h = android();
    connect(&h).await;

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;
    h.coordinator.on_call_state_changed(CallState::Ended).await;
    h.coordinator.on_app_lifecycle_changed(AppState::Active).await;

    assert_eq!(h.ui.returns(), 0);
    assert!(!h.coordinator.app_snapshot().await.was_backgrounded_during_call);
}

#[tokio::test(start_paused = true)]
async fn test_background_without_call_does_nothing() {
    let h = android();

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;
    h.coordinator.on_app_lifecycle_changed(AppState::Active).await;

    assert!(h.device.calls().is_empty());
    assert!(h.coordinator.take_events().await.is_empty());
    assert_eq!(h.ui.returns(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ios_inactive_then_background_keeps_wake_lock() {
    let h = harness(Platform::Ios);
    connect(&h).await;

    h.coordinator.on_app_lifecycle_changed(AppState::Inactive).await;
    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;

    assert!(h.device.is_wake_held());
    assert_eq!(h.device.display_count(), 0);
    assert_eq!(background_events(&event_kinds(&h).await), vec![false]);

    h.coordinator.on_app_lifecycle_changed(AppState::Active).await;
    assert_eq!(h.ui.returns(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_call_after_ending_in_background_is_not_a_return() {
    let h = android();
    connect(&h).await;

    h.coordinator.on_app_lifecycle_changed(AppState::Background).await;
    h.coordinator.on_call_state_changed(CallState::Ended).await;
    assert!(!h.coordinator.app_snapshot().await.was_backgrounded_during_call);

    // Second call rings before the app is brought back
    h.coordinator
        .apply_inputs(smith_call(CallState::Ringing).with_call_id("call-smith-2"))
        .await;
    h.coordinator.on_app_lifecycle_changed(AppState::Active).await;

    assert_eq!(h.ui.returns(), 0);
    assert!(!event_kinds(&h)
        .await
        .contains(&LifecycleEventKind::ReturnedFromBackground));
}
