//! Notification payload types handed to the notification backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Notification importance on the channel / notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Max,
}

/// Lock-screen visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
}

/// Android foreground service capability, must match the manifest declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForegroundServiceType {
    PhoneCall,
    MediaPlayback,
    Microphone,
    Camera,
}

/// Identifier carried by a notification action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationActionId {
    ToggleMute,
    ToggleSpeaker,
    EndCall,
}

impl NotificationActionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationActionId::ToggleMute => "toggle_mute",
            NotificationActionId::ToggleSpeaker => "toggle_speaker",
            NotificationActionId::EndCall => "end_call",
        }
    }
}

impl fmt::Display for NotificationActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationActionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle_mute" => Ok(NotificationActionId::ToggleMute),
            "toggle_speaker" => Ok(NotificationActionId::ToggleSpeaker),
            "end_call" => Ok(NotificationActionId::EndCall),
            other => Err(format!("Unknown notification action: {}", other)),
        }
    }
}

/// Action button on the call notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: NotificationActionId,
    pub title: String,
    /// Rendered in the platform's destructive style (red)
    pub destructive: bool,
}

impl NotificationAction {
    pub fn new(id: NotificationActionId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            destructive: false,
        }
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// Notification channel registered once per process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// Fully rendered call notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallNotification {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub actions: Vec<NotificationAction>,
    pub importance: Importance,
    pub visibility: Visibility,
    pub full_screen_intent: bool,
    /// Cannot be swiped away
    pub ongoing: bool,
    /// Attach the notification to the foreground service
    pub foreground_service: bool,
    /// Empty means "let the platform use the manifest defaults"
    pub service_types: Vec<ForegroundServiceType>,
}

impl CallNotification {
    pub fn action_ids(&self) -> Vec<NotificationActionId> {
        self.actions.iter().map(|a| a.id).collect()
    }
}
