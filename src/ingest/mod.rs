//! Frame ingestion sources.
//!
//! Sources produce `Frame` instances at the device capture rate. The
//! pipeline pulls frames one at a time and owns all rate limiting; sources
//! only report whether they are healthy and how many frames they have
//! produced.
//!
//! Concrete sources:
//! - `SyntheticSource` (stub:// URLs): deterministic generated scenes for
//!   tests and the demo binary.
//!
//! Real camera sources (V4L2, MJPEG-over-HTTP) live behind the same trait in
//! deployment builds.

mod synthetic;

pub use synthetic::{SyntheticConfig, SyntheticSource};

use anyhow::Result;

use crate::frame::Frame;

/// A source of captured frames.
pub trait FrameSource: Send {
    /// Establish the capture session. Called once before the first frame.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame. A transient failure is an `Err`; the caller
    /// decides retry policy.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Whether the source considers itself usable.
    fn is_healthy(&self) -> bool;

    /// Capture statistics for health logging.
    fn stats(&self) -> SourceStats;
}

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub url: String,
}
