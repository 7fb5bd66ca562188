use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_SOURCE_URL: &str = "stub://camera";
const DEFAULT_SOURCE_WIDTH: u32 = 640;
const DEFAULT_SOURCE_HEIGHT: u32 = 480;

const DEFAULT_WINDOW_SIZE: usize = 5;
const DEFAULT_STABILITY_RATIO: f64 = 0.6;
const DEFAULT_PROCESS_EVERY: u32 = 2;
const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;
const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:8080/detect";
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 2000;

const DEFAULT_SIMILARITY_THRESHOLD: u32 = 85;
const DEFAULT_STABILITY_COUNT: u32 = 3;
const DEFAULT_OCR_EVERY: u32 = 1;
const DEFAULT_MIN_WORDS: usize = 2;
const DEFAULT_MIN_AVG_WORD_LEN: f64 = 2.0;

const DEFAULT_MQTT_BROKER: &str = "127.0.0.1:1883";
const DEFAULT_TOPIC_PREFIX: &str = "percept";
const DEFAULT_CLIENT_ID: &str = "percept-relay";

const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:53";
const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;

const DEFAULT_BATTERY_CAPACITY_MAH: f64 = 5200.0;
const DEFAULT_BATTERY_INTERVAL_SECS: u64 = 30;

const DEFAULT_MAX_CAPTURE_FAILURES: u32 = 20;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
const DEFAULT_SKIP_SLEEP_MS: u64 = 10;

#[derive(Debug, Deserialize, Default)]
struct PerceptConfigFile {
    source: Option<SourceConfigFile>,
    detect: Option<DetectConfigFile>,
    text: Option<TextConfigFile>,
    mqtt: Option<MqttConfigFile>,
    connectivity: Option<ConnectivityConfigFile>,
    battery: Option<BatteryConfigFile>,
    capture: Option<CaptureConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectConfigFile {
    window_size: Option<usize>,
    stability_ratio: Option<f64>,
    process_every: Option<u32>,
    min_confidence: Option<f32>,
    remote_url: Option<String>,
    remote_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TextConfigFile {
    similarity_threshold: Option<u32>,
    stability_count: Option<u32>,
    ocr_every: Option<u32>,
    min_words: Option<usize>,
    min_avg_word_len: Option<f64>,
    spell_correction: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct MqttConfigFile {
    broker_addr: Option<String>,
    topic_prefix: Option<String>,
    client_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConnectivityConfigFile {
    probe_addr: Option<String>,
    interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct BatteryConfigFile {
    capacity_mah: Option<f64>,
    interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    max_consecutive_failures: Option<u32>,
    retry_backoff_ms: Option<u64>,
    skip_sleep_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct PerceptConfig {
    pub source: SourceSettings,
    pub detect: DetectSettings,
    pub text: TextSettings,
    pub mqtt: MqttSettings,
    pub connectivity: ConnectivitySettings,
    pub battery: BatterySettings,
    pub capture: CaptureSettings,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct DetectSettings {
    pub window_size: usize,
    pub stability_ratio: f64,
    pub process_every: u32,
    pub min_confidence: f32,
    pub remote_url: String,
    pub remote_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct TextSettings {
    pub similarity_threshold: u32,
    pub stability_count: u32,
    pub ocr_every: u32,
    pub min_words: usize,
    pub min_avg_word_len: f64,
    pub spell_correction: bool,
}

#[derive(Debug, Clone)]
pub struct MqttSettings {
    pub broker_addr: String,
    pub topic_prefix: String,
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct ConnectivitySettings {
    pub probe_addr: String,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct BatterySettings {
    pub capacity_mah: f64,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub max_consecutive_failures: u32,
    pub retry_backoff: Duration,
    pub skip_sleep: Duration,
}

impl PerceptConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PERCEPT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PerceptConfigFile) -> Self {
        let source = file.source.unwrap_or_default();
        let detect = file.detect.unwrap_or_default();
        let text = file.text.unwrap_or_default();
        let mqtt = file.mqtt.unwrap_or_default();
        let connectivity = file.connectivity.unwrap_or_default();
        let battery = file.battery.unwrap_or_default();
        let capture = file.capture.unwrap_or_default();

        Self {
            source: SourceSettings {
                url: source.url.unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
                width: source.width.unwrap_or(DEFAULT_SOURCE_WIDTH),
                height: source.height.unwrap_or(DEFAULT_SOURCE_HEIGHT),
            },
            detect: DetectSettings {
                window_size: detect.window_size.unwrap_or(DEFAULT_WINDOW_SIZE),
                stability_ratio: detect.stability_ratio.unwrap_or(DEFAULT_STABILITY_RATIO),
                process_every: detect.process_every.unwrap_or(DEFAULT_PROCESS_EVERY),
                min_confidence: detect.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE),
                remote_url: detect
                    .remote_url
                    .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()),
                remote_timeout: Duration::from_millis(
                    detect.remote_timeout_ms.unwrap_or(DEFAULT_REMOTE_TIMEOUT_MS),
                ),
            },
            text: TextSettings {
                similarity_threshold: text
                    .similarity_threshold
                    .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
                stability_count: text.stability_count.unwrap_or(DEFAULT_STABILITY_COUNT),
                ocr_every: text.ocr_every.unwrap_or(DEFAULT_OCR_EVERY),
                min_words: text.min_words.unwrap_or(DEFAULT_MIN_WORDS),
                min_avg_word_len: text.min_avg_word_len.unwrap_or(DEFAULT_MIN_AVG_WORD_LEN),
                spell_correction: text.spell_correction.unwrap_or(false),
            },
            mqtt: MqttSettings {
                broker_addr: mqtt
                    .broker_addr
                    .unwrap_or_else(|| DEFAULT_MQTT_BROKER.to_string()),
                topic_prefix: mqtt
                    .topic_prefix
                    .unwrap_or_else(|| DEFAULT_TOPIC_PREFIX.to_string()),
                client_id: mqtt
                    .client_id
                    .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            },
            connectivity: ConnectivitySettings {
                probe_addr: connectivity
                    .probe_addr
                    .unwrap_or_else(|| DEFAULT_PROBE_ADDR.to_string()),
                interval: Duration::from_secs(
                    connectivity
                        .interval_secs
                        .unwrap_or(DEFAULT_PROBE_INTERVAL_SECS),
                ),
            },
            battery: BatterySettings {
                capacity_mah: battery.capacity_mah.unwrap_or(DEFAULT_BATTERY_CAPACITY_MAH),
                interval: Duration::from_secs(
                    battery.interval_secs.unwrap_or(DEFAULT_BATTERY_INTERVAL_SECS),
                ),
            },
            capture: CaptureSettings {
                max_consecutive_failures: capture
                    .max_consecutive_failures
                    .unwrap_or(DEFAULT_MAX_CAPTURE_FAILURES),
                retry_backoff: Duration::from_millis(
                    capture.retry_backoff_ms.unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
                ),
                skip_sleep: Duration::from_millis(
                    capture.skip_sleep_ms.unwrap_or(DEFAULT_SKIP_SLEEP_MS),
                ),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("PERCEPT_SOURCE_URL") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Ok(url) = std::env::var("PERCEPT_REMOTE_URL") {
            if !url.trim().is_empty() {
                self.detect.remote_url = url;
            }
        }
        if let Ok(addr) = std::env::var("PERCEPT_MQTT_BROKER") {
            if !addr.trim().is_empty() {
                self.mqtt.broker_addr = addr;
            }
        }
        if let Ok(prefix) = std::env::var("PERCEPT_TOPIC_PREFIX") {
            if !prefix.trim().is_empty() {
                self.mqtt.topic_prefix = prefix;
            }
        }
        if let Ok(addr) = std::env::var("PERCEPT_PROBE_ADDR") {
            if !addr.trim().is_empty() {
                self.connectivity.probe_addr = addr;
            }
        }
        if let Ok(interval) = std::env::var("PERCEPT_PROBE_INTERVAL_SECS") {
            let secs: u64 = interval.parse().map_err(|_| {
                anyhow!("PERCEPT_PROBE_INTERVAL_SECS must be an integer number of seconds")
            })?;
            self.connectivity.interval = Duration::from_secs(secs);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.detect.window_size == 0 {
            return Err(anyhow!("detect.window_size must be greater than zero"));
        }
        if !(self.detect.stability_ratio > 0.0 && self.detect.stability_ratio <= 1.0) {
            return Err(anyhow!("detect.stability_ratio must be in (0, 1]"));
        }
        if self.detect.process_every == 0 {
            return Err(anyhow!("detect.process_every must be at least 1"));
        }
        if self.text.ocr_every == 0 {
            return Err(anyhow!("text.ocr_every must be at least 1"));
        }
        if self.text.similarity_threshold > 100 {
            return Err(anyhow!("text.similarity_threshold must be 0-100"));
        }
        if self.text.stability_count == 0 {
            return Err(anyhow!("text.stability_count must be at least 1"));
        }
        if self.capture.max_consecutive_failures == 0 {
            return Err(anyhow!(
                "capture.max_consecutive_failures must be at least 1"
            ));
        }
        if self.detect.remote_timeout.is_zero() {
            return Err(anyhow!("detect.remote_timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for PerceptConfig {
    fn default() -> Self {
        Self::from_file(PerceptConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<PerceptConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
