//! percept-relay
//!
//! Debounced scene-perception relay for a battery-powered camera device.
//! Two noisy per-frame perception sources (an object classifier and an OCR
//! extractor) are stabilized into a low-rate, change-only event stream
//! suitable for a slow best-effort notification channel.
//!
//! # Architecture
//!
//! One processing thread runs the whole cycle:
//!
//! ```text
//! FrameSource -> InferenceBackend (local|remote) -> ObjectStabilizer -> ChangeGate -> NotifySink
//!             -> TextExtractor -> meaningfulness filter -> TextStabilizer ----------^
//! ```
//!
//! The connectivity flag selects the remote backend when a network path is
//! usable; both backends produce the same `DetectionSet` shape, so a switch
//! mid-run never looks like a scene change downstream.
//!
//! # Module Structure
//!
//! - `ingest`: frame sources
//! - `detect`: local/remote inference backends and vocabulary
//! - `ocr`: OCR capability surface and phrase assembly
//! - `stabilize`: windowed majority vote (objects) and hysteresis (text)
//! - `gate`: change-only publish gate
//! - `notify`: best-effort sinks (MQTT, log, in-memory)
//! - `connectivity`: single-writer availability flag and poller
//! - `battery`: pack telemetry and status formatting
//! - `pipeline`: the orchestrator loop

pub mod battery;
pub mod config;
pub mod connectivity;
pub mod detect;
pub mod frame;
pub mod gate;
pub mod ingest;
pub mod notify;
pub mod ocr;
pub mod pipeline;
pub mod stabilize;

pub use battery::{BatteryMonitor, BatteryProbe, BatteryReading, StubBatteryProbe};
pub use config::PerceptConfig;
pub use connectivity::{spawn_poller, ConnectivityFlag, ConnectivityProbe, ConnectivityReader, TcpProbe};
pub use detect::{Classifier, DetectionSet, InferenceBackend, LocalBackend, RemoteBackend, RemoteConfig, StubClassifier};
pub use frame::Frame;
pub use gate::ChangeGate;
pub use ingest::{FrameSource, SourceStats, SyntheticConfig, SyntheticSource};
pub use notify::{LogSink, MemorySink, MqttConfig, MqttSink, NotifySink, BATTERY_CHANNEL, OBJECTS_CHANNEL, TEXT_CHANNEL};
pub use ocr::{NoopCorrector, NoopExtractor, SpellCorrector, TextExtractor, TextLine};
pub use pipeline::{CycleOutcome, Pipeline, PipelineConfig};
pub use stabilize::{format_stable_labels, similarity_ratio, ObjectStabilizer, TextStabilizer, NO_OBJECTS_PLACEHOLDER};
