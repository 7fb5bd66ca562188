//! Object detection backends.
//!
//! Two interchangeable backends produce the same `DetectionSet` shape:
//! - `LocalBackend`: on-device classifier, used while offline.
//! - `RemoteBackend`: remote inference service, used while the connectivity
//!   flag reports a usable network path.
//!
//! The stabilizer downstream never learns which backend ran; a mid-run
//! switch must not surface as a semantic scene change.

mod backend;
mod labels;
mod local;
mod remote;

pub use backend::{DetectionSet, InferenceBackend};
pub use labels::normalize_label;
pub use local::{Classifier, LocalBackend, StubClassifier};
pub use remote::{RemoteBackend, RemoteConfig};
