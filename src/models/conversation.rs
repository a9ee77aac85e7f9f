use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{SearchFilter, ServiceCategory};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    Idle,
    CollectingFrom,
    CollectingTo,
    CollectingPassengers,
    Complete,
}

impl DialogueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::Idle => "idle",
            DialogueState::CollectingFrom => "collecting_from",
            DialogueState::CollectingTo => "collecting_to",
            DialogueState::CollectingPassengers => "collecting_passengers",
            DialogueState::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "collecting_from" => DialogueState::CollectingFrom,
            "collecting_to" => DialogueState::CollectingTo,
            "collecting_passengers" => DialogueState::CollectingPassengers,
            "complete" => DialogueState::Complete,
            _ => DialogueState::Idle,
        }
    }
}

/// Required booking slots, filled in fixed order: from, to, passengers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    From,
    To,
    Passengers,
}

impl SlotKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::From => "from",
            SlotKey::To => "to",
            SlotKey::Passengers => "passengers",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            SlotKey::From => "Where will you be departing from?",
            SlotKey::To => "Where would you like to go?",
            SlotKey::Passengers => "How many passengers will be traveling?",
        }
    }

    pub fn collecting_state(&self) -> DialogueState {
        match self {
            SlotKey::From => DialogueState::CollectingFrom,
            SlotKey::To => DialogueState::CollectingTo,
            SlotKey::Passengers => DialogueState::CollectingPassengers,
        }
    }
}

/// Slot values for one booking dialogue. Immutable: every transition
/// consumes the value and returns a new one, so stale in-place mutation
/// cannot leak between messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSlots {
    pub service: Option<ServiceCategory>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub passengers: Option<i64>,
}

impl ConversationSlots {
    /// Start collecting for a service; any previously collected slots are
    /// dropped so a new request never inherits values from an old one.
    pub fn with_service(self, service: ServiceCategory) -> Self {
        ConversationSlots {
            service: Some(service),
            from: None,
            to: None,
            passengers: None,
        }
    }

    /// Fold newly extracted fields in. Fields the extractor did not find
    /// leave the existing value untouched.
    pub fn merged(self, filter: &SearchFilter) -> Self {
        ConversationSlots {
            service: filter.service.or(self.service),
            from: filter.from.clone().or(self.from),
            to: filter.to.clone().or(self.to),
            passengers: filter.passengers.or(self.passengers),
        }
    }

    pub fn with_slot(self, key: SlotKey, value: &str) -> Self {
        let mut next = self;
        match key {
            SlotKey::From => next.from = Some(value.to_string()),
            SlotKey::To => next.to = Some(value.to_string()),
            SlotKey::Passengers => next.passengers = value.trim().parse().ok(),
        }
        next
    }

    /// First missing required slot, in fixed order; None once complete.
    pub fn next_missing(&self) -> Option<SlotKey> {
        if self.from.as_deref().map_or(true, |s| s.is_empty()) {
            Some(SlotKey::From)
        } else if self.to.as_deref().map_or(true, |s| s.is_empty()) {
            Some(SlotKey::To)
        } else if self.passengers.is_none() {
            Some(SlotKey::Passengers)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub messages: Vec<ConversationMessage>,
    pub state: DialogueState,
    pub slots: ConversationSlots,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}
