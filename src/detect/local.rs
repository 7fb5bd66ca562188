//! On-device detection backend.

use anyhow::Result;
use sha2::{Digest, Sha256};

use super::backend::{DetectionSet, InferenceBackend};
use super::labels::normalize_label;
use crate::frame::Frame;

/// On-device classifier capability: given a frame, produce (label,
/// confidence) pairs. The model itself (YOLO or similar) lives behind this
/// trait; the backend only filters and normalizes its output.
pub trait Classifier: Send {
    fn classify(&mut self, frame: &Frame) -> Result<Vec<(String, f32)>>;
}

/// Local inference backend.
///
/// Wraps a `Classifier`, drops detections below the confidence floor or
/// outside the allowed vocabulary, and returns publishable labels.
pub struct LocalBackend {
    classifier: Box<dyn Classifier>,
    min_confidence: f32,
}

impl LocalBackend {
    pub fn new(classifier: Box<dyn Classifier>, min_confidence: f32) -> Self {
        Self {
            classifier,
            min_confidence,
        }
    }
}

impl InferenceBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectionSet> {
        let raw = self.classifier.classify(frame)?;
        let mut labels = DetectionSet::new();
        for (label, confidence) in raw {
            if confidence < self.min_confidence {
                continue;
            }
            if let Some(published) = normalize_label(&label) {
                labels.insert(published.to_string());
            }
        }
        Ok(labels)
    }
}

/// Stub classifier for tests and the demo. Derives detections from a pixel
/// hash so identical frames classify identically.
pub struct StubClassifier;

impl StubClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for StubClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<Vec<(String, f32)>> {
        let digest: [u8; 32] = Sha256::digest(&frame.pixels).into();

        let mut detections = vec![("car".to_string(), 0.9)];
        if digest[0] % 2 == 0 {
            detections.push(("person".to_string(), 0.8));
        }
        if digest[1] % 4 == 0 {
            detections.push(("traffic light".to_string(), 0.6));
        }
        Ok(detections)
    }
}
