//! Body-centric keypoint normalization.
//!
//! Removes camera distance and framing offset so positions from an observed
//! frame and a reference exemplar captured at a different scale are
//! comparable. Torso-anchored when possible, bounding-box fallback otherwise.

use posematch_core::{centroid, midpoint, BoundingBox2D, Landmark, PoseFrame, Position2D};

use crate::config::NormalizerConfig;

/// Normalize a frame into a body-centric unit box around (0.5, 0.5).
///
/// The input is never mutated; confidence values pass through unchanged.
/// Degenerate input (missing torso, collapsed geometry) degrades to the
/// bounding-box fallback rather than raising an error.
pub fn normalize(frame: &PoseFrame, config: &NormalizerConfig) -> PoseFrame {
    normalize_torso(frame, config).unwrap_or_else(|| normalize_bounding_box(frame, config))
}

/// Torso-anchored normalization: centroid of shoulders and hips as origin,
/// scale from the dominant torso dimension.
fn normalize_torso(frame: &PoseFrame, config: &NormalizerConfig) -> Option<PoseFrame> {
    let mut anchors = [Position2D::origin(); 4];
    for (slot, &landmark) in anchors.iter_mut().zip(Landmark::torso()) {
        *slot = frame.visible(landmark, config.torso_floor)?.position;
    }
    let [left_shoulder, right_shoulder, left_hip, right_hip] = anchors;

    let center = centroid(&anchors)?;

    let shoulder_width = left_shoulder.distance_to(&right_shoulder);
    let hip_width = left_hip.distance_to(&right_hip);
    let torso_height = midpoint(&left_shoulder, &right_shoulder)
        .distance_to(&midpoint(&left_hip, &right_hip));

    let scale = shoulder_width.max(hip_width).max(torso_height) * config.scale_factor;
    if scale <= f32::EPSILON {
        return None;
    }

    Some(remap(frame, |p| {
        Position2D::new(
            (p.x - center.x) / scale + 0.5,
            (p.y - center.y) / scale + 0.5,
        )
    }))
}

/// Fallback: stretch the visible bounding box to [0,1] per axis.
///
/// Not invariant to body proportions across subjects, but never divides by
/// zero and always yields a usable frame.
fn normalize_bounding_box(frame: &PoseFrame, config: &NormalizerConfig) -> PoseFrame {
    let visible: Vec<Position2D> = frame
        .detections()
        .filter(|d| d.confidence >= config.torso_floor)
        .map(|d| d.position)
        .collect();

    let Some(bbox) = BoundingBox2D::from_points(&visible) else {
        return frame.clone();
    };

    let width = if bbox.width() > f32::EPSILON {
        bbox.width()
    } else {
        1.0
    };
    let height = if bbox.height() > f32::EPSILON {
        bbox.height()
    } else {
        1.0
    };

    remap(frame, |p| {
        Position2D::new((p.x - bbox.min.x) / width, (p.y - bbox.min.y) / height)
    })
}

fn remap(frame: &PoseFrame, f: impl Fn(&Position2D) -> Position2D) -> PoseFrame {
    let mut out = PoseFrame::empty(frame.timestamp);
    for detection in frame.detections() {
        let mut mapped = *detection;
        mapped.position = f(&detection.position);
        out.set(mapped);
    }
    out
}
