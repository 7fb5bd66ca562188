use std::collections::BTreeSet;

use anyhow::Result;

use crate::frame::Frame;

/// Object labels detected in one processing cycle. Set semantics: no
/// duplicates, no ordering beyond the BTreeSet's, produced fresh each cycle.
pub type DetectionSet = BTreeSet<String>;

/// Inference backend trait.
///
/// Implementations must return labels from the bounded vocabulary in
/// `detect::labels`, already translated to the consumer language. An empty
/// set is valid and means "nothing detected".
///
/// `detect` is allowed to block, but only within the bound the backend was
/// constructed with; a slow remote call must fail for the cycle rather than
/// stall the pipeline indefinitely.
pub trait InferenceBackend: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &Frame) -> Result<DetectionSet>;
}
