//! Capture/processing orchestrator.
//!
//! One thread of control drives the whole cycle: pull a frame, gate the
//! processing rate, pick an inference backend from the connectivity flag,
//! feed both stabilizers, and push genuine changes through the gate to the
//! sink. The stabilizers never learn which backend ran; switching backends
//! mid-run surfaces only through the normal windowed vote.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::connectivity::ConnectivityReader;
use crate::detect::{DetectionSet, InferenceBackend};
use crate::gate::ChangeGate;
use crate::ingest::FrameSource;
use crate::notify::{NotifySink, OBJECTS_CHANNEL, TEXT_CHANNEL};
use crate::ocr::{assemble_phrases, SpellCorrector, TextExtractor};
use crate::stabilize::{format_stable_labels, ObjectStabilizer, TextStabilizer};

/// Orchestrator tuning. Mirrors the corresponding `PerceptConfig` sections;
/// tests construct it directly with zero sleeps.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Run full object inference on every Nth captured frame.
    pub process_every: u32,
    /// Run OCR on every Mth processed cycle. Independent of
    /// `process_every` on purpose.
    pub ocr_every: u32,
    pub window_size: usize,
    pub stability_ratio: f64,
    pub similarity_threshold: u32,
    pub stability_count: u32,
    pub min_words: usize,
    pub min_avg_word_len: f64,
    /// Sleep on frames skipped by the rate gate.
    pub skip_sleep: Duration,
    /// Backoff after a transient capture failure.
    pub retry_backoff: Duration,
    /// Consecutive capture failures tolerated before the run is fatal.
    pub max_consecutive_capture_failures: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            process_every: 2,
            ocr_every: 1,
            window_size: 5,
            stability_ratio: 0.6,
            similarity_threshold: 85,
            stability_count: 3,
            min_words: 2,
            min_avg_word_len: 2.0,
            skip_sleep: Duration::from_millis(10),
            retry_backoff: Duration::from_millis(500),
            max_consecutive_capture_failures: 20,
        }
    }
}

/// What one call to `step` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Capture failed; backed off and will retry.
    Retried,
    /// Frame skipped by the rate gate.
    Skipped,
    /// Full cycle ran (inference and possibly OCR).
    Processed,
}

/// The stabilization pipeline.
pub struct Pipeline {
    source: Box<dyn FrameSource>,
    local: Box<dyn InferenceBackend>,
    remote: Box<dyn InferenceBackend>,
    extractor: Box<dyn TextExtractor>,
    corrector: Option<Box<dyn SpellCorrector>>,
    sink: Arc<dyn NotifySink>,
    connectivity: ConnectivityReader,
    objects: ObjectStabilizer,
    text: TextStabilizer,
    gate: ChangeGate,
    config: PipelineConfig,
    shutdown: Arc<AtomicBool>,
    frame_count: u64,
    ocr_cycle_count: u32,
    capture_failures: u32,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        local: Box<dyn InferenceBackend>,
        remote: Box<dyn InferenceBackend>,
        extractor: Box<dyn TextExtractor>,
        corrector: Option<Box<dyn SpellCorrector>>,
        sink: Arc<dyn NotifySink>,
        connectivity: ConnectivityReader,
        config: PipelineConfig,
    ) -> Self {
        let objects = ObjectStabilizer::new(config.window_size, config.stability_ratio);
        let text = TextStabilizer::new(config.similarity_threshold, config.stability_count);
        Self {
            source,
            local,
            remote,
            extractor,
            corrector,
            sink,
            connectivity,
            objects,
            text,
            gate: ChangeGate::new(),
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            frame_count: 0,
            ocr_cycle_count: 0,
            capture_failures: 0,
        }
    }

    /// Flag handle for an external shutdown trigger (e.g. a Ctrl-C
    /// handler). The loop checks it between cycles.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Connect the source and run cycles until shutdown or a fatal capture
    /// outage.
    pub fn run(&mut self) -> Result<()> {
        self.source.connect()?;
        log::info!("pipeline running: source {}", self.source.stats().url);
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                log::info!("pipeline shutting down");
                return Ok(());
            }
            self.step()?;
        }
    }

    /// Run one iteration of the loop: at most one frame capture attempt.
    pub fn step(&mut self) -> Result<CycleOutcome> {
        let frame = match self.source.next_frame() {
            Ok(frame) => {
                self.capture_failures = 0;
                frame
            }
            Err(e) => {
                self.capture_failures += 1;
                if self.capture_failures >= self.config.max_consecutive_capture_failures {
                    return Err(anyhow!(
                        "frame source unavailable after {} consecutive failures: {}",
                        self.capture_failures,
                        e
                    ));
                }
                log::warn!(
                    "frame capture failed ({} consecutive): {}",
                    self.capture_failures,
                    e
                );
                if !self.source.is_healthy() {
                    log::warn!("frame source unhealthy, attempting reconnect");
                    if let Err(e) = self.source.connect() {
                        log::warn!("reconnect failed: {:#}", e);
                    }
                }
                std::thread::sleep(self.config.retry_backoff);
                return Ok(CycleOutcome::Retried);
            }
        };

        self.frame_count += 1;
        if self.frame_count % self.config.process_every as u64 != 0 {
            if self.config.process_every > 1 {
                std::thread::sleep(self.config.skip_sleep);
            }
            return Ok(CycleOutcome::Skipped);
        }

        let raw_labels = self.detect(&frame);
        self.objects.update(raw_labels);
        let summary = format_stable_labels(self.objects.current());
        if self.gate.changed(OBJECTS_CHANNEL, &summary) {
            // Gate state moves only on a successful hand-off; a transport
            // fault leaves the update eligible for the next cycle.
            match self.sink.send(OBJECTS_CHANNEL, &summary) {
                Ok(()) => self.gate.record(OBJECTS_CHANNEL, &summary),
                Err(e) => log::warn!("object publish failed, will retry: {:#}", e),
            }
        }

        self.ocr_cycle_count += 1;
        if self.ocr_cycle_count >= self.config.ocr_every {
            self.ocr_cycle_count = 0;
            self.run_ocr(&frame);
        }

        Ok(CycleOutcome::Processed)
    }

    /// Select a backend from the connectivity flag and run it. Backend
    /// failure costs only this cycle's vote: it degrades to an empty set.
    fn detect(&mut self, frame: &crate::frame::Frame) -> DetectionSet {
        let backend = if self.connectivity.is_available() {
            &mut self.remote
        } else {
            &mut self.local
        };
        match backend.detect(frame) {
            Ok(labels) => labels,
            Err(e) => {
                log::warn!(
                    "{} backend failed, zero detections this cycle: {:#}",
                    backend.name(),
                    e
                );
                DetectionSet::new()
            }
        }
    }

    fn run_ocr(&mut self, frame: &crate::frame::Frame) {
        let lines = match self.extractor.extract(frame) {
            Ok(lines) => lines,
            Err(e) => {
                // An engine fault is not "text left the scene"; skip the
                // cycle instead of feeding the stabilizer an empty reading.
                log::warn!("text extraction failed, skipping cycle: {:#}", e);
                return;
            }
        };
        let raw_text = assemble_phrases(
            lines,
            self.corrector.as_deref(),
            self.config.min_words,
            self.config.min_avg_word_len,
        );
        if let Some(output) = self.text.update(&raw_text) {
            // The stabilizer's hysteresis already gates repeats, and the
            // empty string is itself a meaningful transition: send as-is.
            if let Err(e) = self.sink.send(TEXT_CHANNEL, &output) {
                log::warn!("text publish failed: {:#}", e);
            }
        }
    }
}
