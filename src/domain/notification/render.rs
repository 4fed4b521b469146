//! Pure rendering of the call notification
//!
//! The rendered payload depends only on the call state, the call type, the
//! caller name and the two toggle mirrors. Rendering the same inputs twice
//! yields the same notification.

use crate::domain::call::{CallSessionContext, CallState, CallType};
use crate::domain::notification::payload::{
    CallNotification, ForegroundServiceType, Importance, NotificationAction,
    NotificationActionId, Visibility,
};

/// How many foreground-service capabilities to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceTypePolicy {
    /// Phone call, media playback, microphone, plus camera for video
    Full,
    /// No explicit types; used after a manifest mismatch
    Reduced,
}

#[derive(Debug, Clone)]
pub struct NotificationRenderer {
    notification_id: String,
    channel_id: String,
}

impl NotificationRenderer {
    pub fn new(notification_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            notification_id: notification_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Render the notification, or `None` when no call notification should exist.
    pub fn render(
        &self,
        state: CallState,
        session: &CallSessionContext,
        policy: ServiceTypePolicy,
    ) -> Option<CallNotification> {
        let suffix = title_suffix(state, session.is_audio_enabled())?;
        let ringing = state == CallState::Ringing;

        Some(CallNotification {
            id: self.notification_id.clone(),
            channel_id: self.channel_id.clone(),
            title: format!("{} - {}", call_label(session.call_type()), suffix),
            body: body_text(state, session.caller_name()),
            actions: actions_for(state, session),
            importance: if ringing { Importance::Max } else { Importance::High },
            visibility: if ringing { Visibility::Public } else { Visibility::Private },
            full_screen_intent: ringing,
            ongoing: true,
            foreground_service: true,
            service_types: service_types_for(session.call_type(), policy),
        })
    }

    pub fn notification_id(&self) -> &str {
        &self.notification_id
    }
}

fn call_label(call_type: CallType) -> &'static str {
    match call_type {
        CallType::Voice => "📞 Voice call",
        CallType::Video => "📹 Video call",
    }
}

fn title_suffix(state: CallState, audio_enabled: bool) -> Option<&'static str> {
    match state {
        CallState::Ringing => Some("Ringing..."),
        CallState::Connecting => Some("Connecting..."),
        CallState::Connected if audio_enabled => Some("Active"),
        CallState::Connected => Some("Muted"),
        CallState::Idle | CallState::Ended | CallState::Failed => None,
    }
}

fn body_text(state: CallState, caller_name: Option<&str>) -> String {
    match (state, caller_name) {
        (CallState::Ringing, Some(name)) => format!("Calling {}...", name),
        (CallState::Ringing, None) => "Call in progress...".to_string(),
        (CallState::Connecting, Some(name)) => format!("Connecting to {}...", name),
        (CallState::Connecting, None) => "Connecting...".to_string(),
        (_, Some(name)) => format!("With {}", name),
        (_, None) => "Tap to return to call".to_string(),
    }
}

fn actions_for(state: CallState, session: &CallSessionContext) -> Vec<NotificationAction> {
    if !state.is_active() {
        return Vec::new();
    }

    let mut actions = Vec::with_capacity(3);
    let mute_title = if session.is_audio_enabled() { "Mute" } else { "Unmute" };
    actions.push(NotificationAction::new(NotificationActionId::ToggleMute, mute_title));

    if session.call_type() == CallType::Voice {
        let speaker_title = if session.is_speaker_enabled() { "Earpiece" } else { "Speaker" };
        actions.push(NotificationAction::new(
            NotificationActionId::ToggleSpeaker,
            speaker_title,
        ));
    }

    actions.push(NotificationAction::new(NotificationActionId::EndCall, "End Call").destructive());
    actions
}

fn service_types_for(call_type: CallType, policy: ServiceTypePolicy) -> Vec<ForegroundServiceType> {
    match policy {
        ServiceTypePolicy::Reduced => Vec::new(),
        ServiceTypePolicy::Full => {
            let mut types = vec![
                ForegroundServiceType::PhoneCall,
                ForegroundServiceType::MediaPlayback,
                ForegroundServiceType::Microphone,
            ];
            if call_type.is_video() {
                types.push(ForegroundServiceType::Camera);
            }
            types
        }
    }
}
