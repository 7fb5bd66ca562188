//! Change-only publish gate.

use std::collections::HashMap;

/// Per-channel last-value memory. A value passes the gate only when it
/// differs by exact string equality from the last value that passed on the
/// same channel; the fuzzy dedup already happened upstream in the
/// stabilizers.
#[derive(Default)]
pub struct ChangeGate {
    last_forwarded: HashMap<String, String>,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` should be forwarded on `channel`. True for the first
    /// value on a channel and for every value that differs from the last
    /// recorded one.
    pub fn changed(&self, channel: &str, value: &str) -> bool {
        match self.last_forwarded.get(channel) {
            Some(last) => last != value,
            None => true,
        }
    }

    /// Record `value` as delivered on `channel`. Callers record only after
    /// the transport accepted the hand-off, so a failed send leaves the gate
    /// open and the value goes out on the next cycle.
    pub fn record(&mut self, channel: &str, value: &str) {
        self.last_forwarded
            .insert(channel.to_string(), value.to_string());
    }
}
