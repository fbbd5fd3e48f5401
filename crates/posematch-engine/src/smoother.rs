//! Temporal smoothing of per-frame matches.
//!
//! A label is only surfaced once it is corroborated across a short recent
//! window, which suppresses occlusion flicker and transient
//! misclassifications without adding perceptible latency.

use std::collections::VecDeque;

use posematch_core::{ClassificationResult, Timestamp};

use crate::config::SmootherConfig;

/// Weight of the occurrence fraction in the smoothed score
const CONSISTENCY_WEIGHT: f32 = 0.7;
/// Weight of the mean per-frame confidence in the smoothed score
const CONFIDENCE_WEIGHT: f32 = 0.3;

/// One per-frame match observation
#[derive(Debug, Clone)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub timestamp: Timestamp,
}

/// Bounded, time-ordered detection history with majority-vote readout.
///
/// Owned by exactly one classification stream; concurrent streams each get
/// their own instance.
#[derive(Debug)]
pub struct TemporalSmoother {
    history: VecDeque<Detection>,
    config: SmootherConfig,
}

impl TemporalSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.capacity + 1),
            config,
        }
    }

    /// Append a detection, enforcing both the count cap and the wall-clock
    /// TTL (relative to the incoming detection's timestamp).
    pub fn add(&mut self, detection: Detection) {
        let now = detection.timestamp;
        self.history
            .retain(|d| now.millis_since(d.timestamp) <= self.config.ttl_ms);

        self.history.push_back(detection);
        while self.history.len() > self.config.capacity {
            self.history.pop_front();
        }
    }

    /// Stabilized classification over the current window.
    ///
    /// Requires a minimum sample count, then reports the label whose
    /// occurrence fraction clears the consistency threshold with the best
    /// blended consistency/confidence score. Everything else is Unknown/0.
    pub fn smoothed_pose(&self) -> ClassificationResult {
        if self.history.len() < self.config.min_history {
            return ClassificationResult::unknown();
        }

        // Group by label in first-seen order so ties resolve deterministically
        let mut groups: Vec<(&str, usize, f32)> = Vec::new();
        for d in &self.history {
            match groups.iter_mut().find(|(label, ..)| *label == d.label) {
                Some((_, count, confidence_sum)) => {
                    *count += 1;
                    *confidence_sum += d.confidence;
                }
                None => groups.push((&d.label, 1, d.confidence)),
            }
        }

        let window = self.history.len() as f32;
        let mut best: Option<(&str, f32)> = None;

        for (label, count, confidence_sum) in groups {
            let fraction = count as f32 / window;
            if fraction < self.config.consistency_threshold {
                continue;
            }

            let mean_confidence = confidence_sum / count as f32;
            let score = CONSISTENCY_WEIGHT * fraction + CONFIDENCE_WEIGHT * mean_confidence;

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((label, score));
            }
        }

        match best {
            Some((label, score)) => {
                let result = ClassificationResult::new(label, score);
                // A dominant Unknown collapses to the canonical value
                if result.is_unknown() {
                    ClassificationResult::unknown()
                } else {
                    result
                }
            }
            None => ClassificationResult::unknown(),
        }
    }

    /// Clear all history. Call at lifecycle boundaries that make old votes
    /// stale: target pose changed, camera restarted, detector reinitialized.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
