//! Best-effort notification sinks.
//!
//! A sink accepts (channel, UTF-8 value) pairs and forwards them to a
//! connected peer with no delivery guarantee: if nobody is listening the
//! send is a silent no-op, and a send must not block the pipeline past a
//! bounded duration. The deployed transport is MQTT; the original device
//! pushed the same channels over BLE GATT notifications behind this exact
//! surface.

mod mqtt;

pub use mqtt::{MqttConfig, MqttSink};

use std::sync::Mutex;

use anyhow::Result;

/// Channel carrying the stable-object summary string.
pub const OBJECTS_CHANNEL: &str = "objects";
/// Channel carrying the stabilized text string (empty string = text gone).
pub const TEXT_CHANNEL: &str = "text";
/// Channel carrying the formatted battery status string.
pub const BATTERY_CHANNEL: &str = "battery";

/// Best-effort publish sink.
pub trait NotifySink: Send + Sync {
    /// Forward a value on a channel. Delivery is best-effort; "no peer
    /// listening" is success. Errors are for transport faults the caller
    /// may want to log, never to retry synchronously.
    fn send(&self, channel: &str, value: &str) -> Result<()>;
}

/// Sink that logs every send. Useful for running the daemon without a
/// broker.
pub struct LogSink;

impl NotifySink for LogSink {
    fn send(&self, channel: &str, value: &str) -> Result<()> {
        log::info!("notify [{}]: {:?}", channel, value);
        Ok(())
    }
}

/// Capturing sink for tests.
#[derive(Default)]
pub struct MemorySink {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sends so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("memory sink lock").clone()
    }

    /// Sends on one channel, in order.
    pub fn channel_values(&self, channel: &str) -> Vec<String> {
        self.sent
            .lock()
            .expect("memory sink lock")
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl NotifySink for MemorySink {
    fn send(&self, channel: &str, value: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("memory sink lock")
            .push((channel.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.send(OBJECTS_CHANNEL, "carro").unwrap();
        sink.send(TEXT_CHANNEL, "bom dia").unwrap();
        sink.send(OBJECTS_CHANNEL, "none").unwrap();

        assert_eq!(
            sink.channel_values(OBJECTS_CHANNEL),
            vec!["carro".to_string(), "none".to_string()]
        );
        assert_eq!(sink.sent().len(), 3);
    }
}
