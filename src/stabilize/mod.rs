//! Temporal stabilization of noisy per-frame perception output.
//!
//! Both stabilizers are single-threaded, stateful transformation
//! components owned by the pipeline. They know nothing about transport or
//! connectivity; they turn per-frame jitter into rarely-changing values.

mod objects;
mod similarity;
mod text;

pub use objects::{format_stable_labels, ObjectStabilizer, NO_OBJECTS_PLACEHOLDER};
pub use similarity::similarity_ratio;
pub use text::TextStabilizer;
