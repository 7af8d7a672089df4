//! Capability flags advertised by an agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional protocol features an agent supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardCapabilities {
    /// Streaming responses.
    pub streaming: bool,
    /// Push notifications.
    pub push_notifications: bool,
    /// Task state transition history.
    pub state_transition_history: bool,
}

impl CardCapabilities {
    /// Enables streaming.
    #[must_use]
    pub const fn with_streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Enables push notifications.
    #[must_use]
    pub const fn with_push_notifications(mut self) -> Self {
        self.push_notifications = true;
        self
    }

    /// Enables state transition history.
    #[must_use]
    pub const fn with_state_transition_history(mut self) -> Self {
        self.state_transition_history = true;
        self
    }

    /// Returns an object carrying only the flags that are set.
    #[must_use]
    pub fn to_enabled_flags(self) -> Map<String, Value> {
        let mut flags = Map::new();
        for (key, enabled) in [
            ("streaming", self.streaming),
            ("pushNotifications", self.push_notifications),
            ("stateTransitionHistory", self.state_transition_history),
        ] {
            if enabled {
                flags.insert(key.to_owned(), Value::Bool(true));
            }
        }
        flags
    }
}
