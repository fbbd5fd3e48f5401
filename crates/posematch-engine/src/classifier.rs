//! Per-frame classification orchestrator.

use std::sync::Arc;

use posematch_core::{ClassificationResult, Landmark, PoseFrame};

use crate::catalog::PoseCatalog;
use crate::config::EngineConfig;
use crate::heuristics::HeuristicRule;
use crate::matcher::PoseMatcher;
use crate::smoother::{Detection, TemporalSmoother};

/// Landmarks that must be in view before matching is worth attempting
const CRITICAL_LANDMARKS: [Landmark; 4] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
];

/// Wires gate, matcher, and smoother together for one classification stream.
///
/// The catalog is shared and read-only; the smoother is exclusively owned.
/// Hosts classifying multiple camera streams create one classifier per
/// stream around the same `Arc<PoseCatalog>`.
pub struct PoseClassifier {
    config: EngineConfig,
    matcher: PoseMatcher,
    smoother: TemporalSmoother,
}

impl PoseClassifier {
    pub fn new(catalog: Arc<PoseCatalog>, config: EngineConfig) -> Self {
        let matcher = PoseMatcher::new(catalog, config.clone());
        let smoother = TemporalSmoother::new(config.smoother.clone());
        Self {
            config,
            matcher,
            smoother,
        }
    }

    /// Attach bootstrap heuristic rules to the underlying matcher
    pub fn with_rules(mut self, rules: Vec<HeuristicRule>) -> Self {
        self.matcher = self.matcher.with_rules(rules);
        self
    }

    /// Classify one frame and return the temporally stabilized result.
    ///
    /// Frames where the subject is not meaningfully in view skip the catalog
    /// scan entirely and vote Unknown, so stale labels decay rather than
    /// sticking while the subject is absent.
    pub fn classify(&mut self, frame: &PoseFrame) -> ClassificationResult {
        let raw = if self.subject_in_view(frame) {
            self.matcher.match_frame(frame)
        } else {
            tracing::trace!("critical landmarks below floor, skipping matcher");
            ClassificationResult::unknown()
        };

        self.smoother.add(Detection {
            label: raw.label.clone(),
            confidence: raw.confidence,
            timestamp: frame.timestamp,
        });

        self.smoother.smoothed_pose()
    }

    /// Single-frame match without touching the history window
    pub fn raw_match(&self, frame: &PoseFrame) -> ClassificationResult {
        if self.subject_in_view(frame) {
            self.matcher.match_frame(frame)
        } else {
            ClassificationResult::unknown()
        }
    }

    /// Clear temporal state. Invoke on context switches that make history
    /// stale: new target pose selected, camera stopped or restarted.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn history_len(&self) -> usize {
        self.smoother.len()
    }

    fn subject_in_view(&self, frame: &PoseFrame) -> bool {
        let visible = CRITICAL_LANDMARKS
            .iter()
            .filter(|&&lm| frame.visible(lm, self.config.critical_floor).is_some())
            .count();
        visible >= self.config.min_critical_landmarks
    }
}
