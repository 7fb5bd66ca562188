//! MQTT notification sink.
//!
//! Publishes channel values to `<topic_prefix>/<channel>` at QoS 0: the
//! transport contract is fire-and-forget, so an offline broker or absent
//! subscriber costs nothing but a log line. The rumqttc connection event
//! loop is drained on a background thread for the life of the sink.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rumqttc::{Client, Connection, Event, MqttOptions, QoS};

use super::NotifySink;

/// Configuration for the MQTT sink.
#[derive(Clone, Debug)]
pub struct MqttConfig {
    /// Broker address as host:port.
    pub broker_addr: String,
    /// Topic prefix; channel names are appended as one level.
    pub topic_prefix: String,
    pub client_id: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_addr: "127.0.0.1:1883".to_string(),
            topic_prefix: "percept".to_string(),
            client_id: "percept-relay".to_string(),
        }
    }
}

/// MQTT-backed publish sink.
pub struct MqttSink {
    client: Client,
    topic_prefix: String,
}

impl MqttSink {
    /// Connect to the broker and start draining the event loop.
    pub fn connect(config: MqttConfig) -> Result<Self> {
        let (host, port) = parse_broker_addr(&config.broker_addr)?;
        let mut options = MqttOptions::new(config.client_id, host, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, connection) = Client::new(options, 16);
        spawn_event_loop(connection);

        Ok(Self {
            client,
            topic_prefix: config.topic_prefix,
        })
    }
}

impl NotifySink for MqttSink {
    fn send(&self, channel: &str, value: &str) -> Result<()> {
        let topic = format!("{}/{}", self.topic_prefix, channel);
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, value.as_bytes().to_vec())
            .with_context(|| format!("mqtt publish on channel {}", channel))
    }
}

/// Drain broker events so the client makes progress. Connection errors are
/// logged and retried by rumqttc's own reconnect cycle.
fn spawn_event_loop(mut connection: Connection) {
    std::thread::spawn(move || {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(incoming)) => log::trace!("mqtt incoming: {:?}", incoming),
                Ok(Event::Outgoing(_)) => {}
                Err(e) => {
                    log::debug!("mqtt connection error (will retry): {}", e);
                    std::thread::sleep(Duration::from_secs(1));
                }
            }
        }
    });
}

fn parse_broker_addr(addr: &str) -> Result<(String, u16)> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("mqtt broker address must be host:port, got '{}'", addr))?;
    let port: u16 = port
        .parse()
        .map_err(|_| anyhow!("invalid mqtt broker port in '{}'", addr))?;
    if host.is_empty() {
        return Err(anyhow!("empty mqtt broker host in '{}'", addr));
    }
    Ok((host.to_string(), port))
}
