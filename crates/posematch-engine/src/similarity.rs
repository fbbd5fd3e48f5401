//! Frame-to-exemplar similarity scoring.
//!
//! One [0,1] score per comparison, blending normalized-position distance
//! with joint-angle distance. Angles carry the larger weight: they are
//! immune to the residual scale and framing error normalization cannot
//! fully remove, while positions disambiguate mirrored or rotated variants
//! of similar angle profiles.

use posematch_core::{Landmark, PoseFrame};

use crate::angles::AngleSet;
use crate::config::MatcherConfig;

/// Curated landmark subset for position comparison: face orientation,
/// shoulder/elbow girdle, and hip/knee/ankle chain.
pub const CORE_LANDMARKS: [Landmark; 15] = [
    Landmark::Nose,
    Landmark::LeftEye,
    Landmark::RightEye,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

/// Minimum usable core landmarks before position evidence counts
pub fn min_usable_core() -> usize {
    8.min(CORE_LANDMARKS.len() / 2)
}

/// Confidence-weighted position similarity over the core subset.
///
/// Returns 0 when fewer than the minimum core landmarks are usable —
/// "no evidence", which the blend then treats the same as a full mismatch
/// rather than special-casing it.
pub fn position_similarity(
    observed: &PoseFrame,
    reference: &PoseFrame,
    visibility_floor: f32,
) -> f32 {
    let mut weighted_distance = 0.0;
    let mut total_weight = 0.0;
    let mut usable = 0usize;

    for lm in CORE_LANDMARKS {
        let Some(obs) = observed.visible(lm, visibility_floor) else {
            continue;
        };
        let Some(exemplar) = reference.get(lm) else {
            continue;
        };

        let distance = obs.position.distance_to(&exemplar.position);
        weighted_distance += distance * obs.confidence;
        total_weight += obs.confidence;
        usable += 1;
    }

    if usable < min_usable_core() || total_weight <= 0.0 {
        return 0.0;
    }

    (1.0 - weighted_distance / total_weight).max(0.0)
}

/// Mean normalized angle difference over joints present in both sets.
pub fn angle_similarity(observed: &AngleSet, reference: &AngleSet) -> f32 {
    let mut total_difference = 0.0;
    let mut compared = 0usize;

    for (joint, &reference_angle) in reference {
        if let Some(&observed_angle) = observed.get(joint) {
            total_difference += (observed_angle - reference_angle).abs() / 180.0;
            compared += 1;
        }
    }

    if compared == 0 {
        return 0.0;
    }

    (1.0 - total_difference / compared as f32).max(0.0)
}

/// Combined similarity between a normalized observed frame and a normalized
/// exemplar. Pure; worst case 0.
pub fn similarity(
    observed: &PoseFrame,
    observed_angles: &AngleSet,
    reference: &PoseFrame,
    reference_angles: &AngleSet,
    config: &MatcherConfig,
    visibility_floor: f32,
) -> f32 {
    let position = position_similarity(observed, reference, visibility_floor);
    let angle = angle_similarity(observed_angles, reference_angles);

    config.position_weight * position + config.angle_weight * angle
}
