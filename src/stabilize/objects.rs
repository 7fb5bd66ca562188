//! Sliding-window majority vote over per-cycle detection sets.

use std::collections::VecDeque;

use crate::detect::DetectionSet;

/// Published placeholder when no object is stable.
pub const NO_OBJECTS_PLACEHOLDER: &str = "none";

/// Windowed majority-vote filter for object labels.
///
/// Keeps the last `window_size` detection sets and calls a label stable when
/// it appears in at least `max(1, floor(window_size * ratio))` of them. The
/// stable set is recomputed from scratch on every update; the window is
/// small, so the O(window * labels) recount is cheaper than keeping
/// incremental counts honest across evictions.
pub struct ObjectStabilizer {
    history: VecDeque<DetectionSet>,
    window_size: usize,
    count_threshold: usize,
    stable: DetectionSet,
}

impl ObjectStabilizer {
    /// `ratio` is the fraction of the window a label must appear in,
    /// e.g. 0.6 over a window of 5 means stable at 3 of 5.
    pub fn new(window_size: usize, ratio: f64) -> Self {
        let mut count_threshold = (window_size as f64 * ratio) as usize;
        if count_threshold == 0 && window_size > 0 {
            count_threshold = 1;
        }
        Self {
            history: VecDeque::with_capacity(window_size),
            window_size,
            count_threshold,
            stable: DetectionSet::new(),
        }
    }

    /// Record one cycle's detections and recompute the stable set.
    pub fn update(&mut self, raw_labels: DetectionSet) {
        if self.window_size == 0 {
            return;
        }
        while self.history.len() >= self.window_size {
            self.history.pop_front();
        }
        self.history.push_back(raw_labels);

        let mut candidates = DetectionSet::new();
        for frame_set in &self.history {
            candidates.extend(frame_set.iter().cloned());
        }

        self.stable = candidates
            .into_iter()
            .filter(|label| {
                let count = self
                    .history
                    .iter()
                    .filter(|frame_set| frame_set.contains(label))
                    .count();
                count >= self.count_threshold
            })
            .collect();
    }

    /// Labels currently considered stable.
    pub fn current(&self) -> &DetectionSet {
        &self.stable
    }
}

/// Wire form of a stable set: lexicographically sorted labels joined with
/// ", ", or the literal "none" when empty. Consumers parse this exact shape.
pub fn format_stable_labels(labels: &DetectionSet) -> String {
    if labels.is_empty() {
        NO_OBJECTS_PLACEHOLDER.to_string()
    } else {
        labels
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
