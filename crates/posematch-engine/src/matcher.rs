//! Frame-versus-catalog matching.

use std::sync::Arc;

use posematch_core::{ClassificationResult, PoseFrame};

use crate::angles::extract_angles;
use crate::catalog::PoseCatalog;
use crate::config::EngineConfig;
use crate::heuristics::HeuristicRule;
use crate::normalizer::normalize;
use crate::similarity::similarity;

/// Scores an observed frame against every catalog entry and applies the
/// acceptance threshold. Deterministic given identical inputs; ties go to
/// the earlier catalog entry (the domain has no natural ordering preference).
pub struct PoseMatcher {
    catalog: Arc<PoseCatalog>,
    rules: Vec<HeuristicRule>,
    config: EngineConfig,
}

impl PoseMatcher {
    pub fn new(catalog: Arc<PoseCatalog>, config: EngineConfig) -> Self {
        Self {
            catalog,
            rules: Vec::new(),
            config,
        }
    }

    /// Attach bootstrap rules for poses lacking a clean exemplar
    pub fn with_rules(mut self, rules: Vec<HeuristicRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn catalog(&self) -> &PoseCatalog {
        &self.catalog
    }

    /// Match one frame against the whole catalog.
    pub fn match_frame(&self, frame: &PoseFrame) -> ClassificationResult {
        if self.catalog.is_empty() && self.rules.is_empty() {
            return ClassificationResult::unknown();
        }

        let observed = normalize(frame, &self.config.normalizer);
        let observed_angles = extract_angles(frame, self.config.visibility_floor);

        let mut best_score = 0.0f32;
        let mut best_label: Option<&str> = None;

        for entry in self.catalog.entries() {
            let score = similarity(
                &observed,
                &observed_angles,
                &entry.normalized,
                &entry.angles,
                &self.config.matcher,
                self.config.visibility_floor,
            );
            tracing::trace!(pose = %entry.pose.name, score, "catalog comparison");

            if score > best_score {
                best_score = score;
                best_label = Some(&entry.pose.name);
            }
        }

        let threshold = self.config.matcher.acceptance_threshold;
        if let Some(label) = best_label {
            if best_score >= threshold {
                let confidence = rescale_confidence(best_score, threshold);
                tracing::debug!(%label, raw = best_score, confidence, "match accepted");
                return ClassificationResult::new(label, confidence);
            }
        }

        // Bootstrap fallback: hand-authored angle predicates, consulted only
        // when the catalog produced nothing above threshold
        for rule in &self.rules {
            if rule.matches(&observed_angles) {
                tracing::debug!(label = %rule.label, "heuristic rule matched");
                return ClassificationResult::new(rule.label.clone(), threshold);
            }
        }

        tracing::debug!(best = best_score, "no match above threshold");
        ClassificationResult::unknown_with_score(best_score)
    }
}

/// Stretch an accepted score into the upper portion of [0,1].
///
/// A marginal acceptance reports confidence near the threshold and strong
/// matches compress toward 1.0. This is a presentation-oriented mapping for
/// UI feedback, not a statistical calibration.
fn rescale_confidence(score: f32, threshold: f32) -> f32 {
    ((score - threshold) * 2.0 + threshold).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::JointAngle;
    use crate::catalog::ReferencePose;
    use crate::heuristics::AngleRange;
    use posematch_core::{Landmark, LandmarkDetection, Position2D, PoseFrame, Timestamp};

    fn standing_frame() -> PoseFrame {
        let mut frame = PoseFrame::empty(Timestamp::from_nanos(0));
        let coords: &[(Landmark, f32, f32)] = &[
            (Landmark::Nose, 0.50, 0.10),
            (Landmark::LeftEye, 0.48, 0.09),
            (Landmark::RightEye, 0.52, 0.09),
            (Landmark::LeftEar, 0.46, 0.10),
            (Landmark::RightEar, 0.54, 0.10),
            (Landmark::LeftShoulder, 0.42, 0.22),
            (Landmark::RightShoulder, 0.58, 0.22),
            (Landmark::LeftElbow, 0.40, 0.34),
            (Landmark::RightElbow, 0.60, 0.34),
            (Landmark::LeftWrist, 0.39, 0.46),
            (Landmark::RightWrist, 0.61, 0.46),
            (Landmark::LeftHip, 0.44, 0.50),
            (Landmark::RightHip, 0.56, 0.50),
            (Landmark::LeftKnee, 0.44, 0.70),
            (Landmark::RightKnee, 0.56, 0.70),
            (Landmark::LeftAnkle, 0.44, 0.88),
            (Landmark::RightAnkle, 0.56, 0.88),
        ];
        for &(lm, x, y) in coords {
            frame.set(LandmarkDetection::new(lm, Position2D::new(x, y), 0.9));
        }
        frame
    }

    fn arms_up_frame() -> PoseFrame {
        let mut frame = standing_frame();
        frame.set(LandmarkDetection::new(
            Landmark::LeftElbow,
            Position2D::new(0.38, 0.12),
            0.9,
        ));
        frame.set(LandmarkDetection::new(
            Landmark::RightElbow,
            Position2D::new(0.62, 0.12),
            0.9,
        ));
        frame.set(LandmarkDetection::new(
            Landmark::LeftWrist,
            Position2D::new(0.36, 0.02),
            0.9,
        ));
        frame.set(LandmarkDetection::new(
            Landmark::RightWrist,
            Position2D::new(0.64, 0.02),
            0.9,
        ));
        frame
    }

    fn catalog_with(poses: Vec<(&str, PoseFrame)>) -> Arc<PoseCatalog> {
        let config = EngineConfig::default();
        let poses = poses
            .into_iter()
            .map(|(name, exemplar)| ReferencePose {
                name: name.to_string(),
                exemplar,
                description: String::new(),
                image_ref: String::new(),
            })
            .collect();
        Arc::new(PoseCatalog::new(poses, &config).unwrap())
    }

    #[test]
    fn test_matching_frame_accepted() {
        let catalog = catalog_with(vec![
            ("Mountain Pose", standing_frame()),
            ("Raised Arms", arms_up_frame()),
        ]);
        let matcher = PoseMatcher::new(catalog, EngineConfig::default());

        let result = matcher.match_frame(&standing_frame());
        assert_eq!(result.label, "Mountain Pose");
        assert!(result.confidence >= 0.55);
    }

    #[test]
    fn test_discriminates_between_poses() {
        let catalog = catalog_with(vec![
            ("Mountain Pose", standing_frame()),
            ("Raised Arms", arms_up_frame()),
        ]);
        let matcher = PoseMatcher::new(catalog, EngineConfig::default());

        let result = matcher.match_frame(&arms_up_frame());
        assert_eq!(result.label, "Raised Arms");
    }

    #[test]
    fn test_empty_catalog_unknown() {
        let config = EngineConfig::default();
        let catalog = Arc::new(PoseCatalog::new(Vec::new(), &config).unwrap());
        let matcher = PoseMatcher::new(catalog, config);

        let result = matcher.match_frame(&standing_frame());
        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_rejection_reports_raw_best_score() {
        // Catalog whose only entry is very unlike the observed frame
        let catalog = catalog_with(vec![("Raised Arms", arms_up_frame())]);

        let mut config = EngineConfig::default();
        config.matcher.acceptance_threshold = 0.999;
        let matcher = PoseMatcher::new(catalog, config);

        let result = matcher.match_frame(&standing_frame());
        assert!(result.is_unknown());
        assert!(result.confidence > 0.0);
        assert!(result.confidence < 0.999);
    }

    #[test]
    fn test_threshold_boundary() {
        let threshold = 0.55f32;
        assert!(0.5499f32 < threshold);
        assert!(0.5501f32 > threshold);

        // Confidence is continuous across the boundary per the rescale
        let at = rescale_confidence(threshold, threshold);
        assert!((at - threshold).abs() < 1e-6);
        let just_above = rescale_confidence(0.5501, threshold);
        assert!((just_above - 0.5502).abs() < 1e-4);
        assert_eq!(rescale_confidence(1.0, threshold), 1.0);
    }

    #[test]
    fn test_heuristic_fallback_below_threshold() {
        let catalog = catalog_with(vec![("Raised Arms", arms_up_frame())]);
        let mut config = EngineConfig::default();
        config.matcher.acceptance_threshold = 0.999;

        // Standing frame has straight knees
        let rule = HeuristicRule::new(
            "Standing",
            vec![
                AngleRange::new(JointAngle::LeftKnee, 160.0, 180.0),
                AngleRange::new(JointAngle::RightKnee, 160.0, 180.0),
            ],
        );
        let matcher = PoseMatcher::new(catalog, config).with_rules(vec![rule]);

        let result = matcher.match_frame(&standing_frame());
        assert_eq!(result.label, "Standing");
        assert!((result.confidence - 0.999).abs() < 1e-6);
    }
}
