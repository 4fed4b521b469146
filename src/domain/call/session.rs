//! Call session context and the inputs the call UI pushes on every render

use crate::domain::call::value_object::{CallState, CallType};
use crate::domain::shared::value_objects::CallId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the call UI's view of the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInputs {
    pub call_state: CallState,
    pub call_id: Option<CallId>,
    pub call_type: CallType,
    pub caller_name: Option<String>,
    pub is_audio_enabled: bool,
    pub is_speaker_enabled: bool,
}

impl CallInputs {
    pub fn new(call_state: CallState) -> Self {
        Self {
            call_state,
            ..Default::default()
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<CallId>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }

    pub fn with_call_type(mut self, call_type: CallType) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn with_caller_name(mut self, caller_name: impl Into<String>) -> Self {
        self.caller_name = Some(caller_name.into());
        self
    }

    pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
        self.is_audio_enabled = enabled;
        self
    }

    pub fn with_speaker_enabled(mut self, enabled: bool) -> Self {
        self.is_speaker_enabled = enabled;
        self
    }
}

impl Default for CallInputs {
    fn default() -> Self {
        Self {
            call_state: CallState::Idle,
            call_id: None,
            call_type: CallType::Voice,
            caller_name: None,
            is_audio_enabled: true,
            is_speaker_enabled: false,
        }
    }
}

/// Per-call context owned by the coordinator.
///
/// Lives from the first active call state until the call ends or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSessionContext {
    call_id: Option<CallId>,
    call_type: CallType,
    caller_name: Option<String>,
    is_audio_enabled: bool,
    is_speaker_enabled: bool,
    started_at: DateTime<Utc>,
}

impl CallSessionContext {
    pub fn from_inputs(inputs: &CallInputs) -> Self {
        Self {
            call_id: inputs.call_id.clone(),
            call_type: inputs.call_type,
            caller_name: normalize_name(inputs.caller_name.as_deref()),
            is_audio_enabled: inputs.is_audio_enabled,
            is_speaker_enabled: inputs.is_speaker_enabled,
            started_at: Utc::now(),
        }
    }

    /// Merge fresh UI inputs. Returns true if anything the notification shows changed.
    pub fn update_from(&mut self, inputs: &CallInputs) -> bool {
        let caller_name = normalize_name(inputs.caller_name.as_deref());
        let changed = self.call_type != inputs.call_type
            || self.caller_name != caller_name
            || self.is_audio_enabled != inputs.is_audio_enabled
            || self.is_speaker_enabled != inputs.is_speaker_enabled;

        if inputs.call_id.is_some() {
            self.call_id = inputs.call_id.clone();
        }
        self.call_type = inputs.call_type;
        self.caller_name = caller_name;
        self.is_audio_enabled = inputs.is_audio_enabled;
        self.is_speaker_enabled = inputs.is_speaker_enabled;

        changed
    }

    /// Flip the audio mirror, returning the new value
    pub fn toggle_audio(&mut self) -> bool {
        self.is_audio_enabled = !self.is_audio_enabled;
        self.is_audio_enabled
    }

    /// Flip the speaker mirror, returning the new value
    pub fn toggle_speaker(&mut self) -> bool {
        self.is_speaker_enabled = !self.is_speaker_enabled;
        self.is_speaker_enabled
    }

    // Getters
    pub fn call_id(&self) -> Option<&CallId> {
        self.call_id.as_ref()
    }

    pub fn call_type(&self) -> CallType {
        self.call_type
    }

    pub fn caller_name(&self) -> Option<&str> {
        self.caller_name.as_deref()
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.is_audio_enabled
    }

    pub fn is_speaker_enabled(&self) -> bool {
        self.is_speaker_enabled
    }

    pub fn started_at(&self) -> &DateTime<Utc> {
        &self.started_at
    }
}

fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
