//! Call lifecycle events

use crate::domain::call::value_object::{CallState, CallType};
use crate::domain::shared::events::{DomainEvent, EventMetadata};
use crate::domain::shared::value_objects::CallId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEventKind {
    SessionStarted { call_type: CallType, state: CallState },
    /// A notification reached the backend; `forced` marks the background-entry path
    NotificationPresented { state: CallState, forced: bool },
    BackgroundEntered { service_started: bool },
    ReturnedFromBackground,
    SessionEnded { final_state: CallState, duration_seconds: i64 },
}

impl LifecycleEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEventKind::SessionStarted { .. } => "call.session_started",
            LifecycleEventKind::NotificationPresented { .. } => "call.notification_presented",
            LifecycleEventKind::BackgroundEntered { .. } => "call.background_entered",
            LifecycleEventKind::ReturnedFromBackground => "call.returned_from_background",
            LifecycleEventKind::SessionEnded { .. } => "call.session_ended",
        }
    }
}

/// Event recorded by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLifecycleEvent {
    pub metadata: EventMetadata,
    pub call_id: Option<CallId>,
    pub kind: LifecycleEventKind,
}

impl CallLifecycleEvent {
    pub fn new(call_id: Option<CallId>, kind: LifecycleEventKind) -> Self {
        Self {
            metadata: EventMetadata::new(kind.name()),
            call_id,
            kind,
        }
    }
}

impl DomainEvent for CallLifecycleEvent {
    fn event_type(&self) -> &'static str {
        self.kind.name()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_follows_kind() {
        let event = CallLifecycleEvent::new(
            Some(CallId::from("call-1")),
            LifecycleEventKind::BackgroundEntered { service_started: true },
        );
        assert_eq!(event.event_type(), "call.background_entered");
        assert_eq!(event.metadata.event_type, "call.background_entered");
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = CallLifecycleEvent::new(None, LifecycleEventKind::ReturnedFromBackground);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "returned_from_background");
    }
}
