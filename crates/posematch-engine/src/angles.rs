//! Joint-angle extraction.
//!
//! Angles between three landmarks are invariant under uniform translation
//! and scaling, so they work identically on raw pixel coordinates and
//! normalized frames. This makes them the primary matching signal.

use std::collections::HashMap;

use posematch_core::{angle_at_vertex, Landmark, PoseFrame};
use serde::{Deserialize, Serialize};

/// Fixed vocabulary of named joint angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointAngle {
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    TorsoLeft,
    TorsoRight,
}

impl JointAngle {
    pub const ALL: [JointAngle; 10] = [
        JointAngle::LeftElbow,
        JointAngle::RightElbow,
        JointAngle::LeftShoulder,
        JointAngle::RightShoulder,
        JointAngle::LeftHip,
        JointAngle::RightHip,
        JointAngle::LeftKnee,
        JointAngle::RightKnee,
        JointAngle::TorsoLeft,
        JointAngle::TorsoRight,
    ];

    /// The `(A, vertex, C)` landmark triple defining this joint's angle
    pub fn triple(&self) -> (Landmark, Landmark, Landmark) {
        use Landmark::*;
        match self {
            JointAngle::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            JointAngle::RightElbow => (RightShoulder, RightElbow, RightWrist),
            JointAngle::LeftShoulder => (LeftElbow, LeftShoulder, LeftHip),
            JointAngle::RightShoulder => (RightElbow, RightShoulder, RightHip),
            JointAngle::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            JointAngle::RightHip => (RightShoulder, RightHip, RightKnee),
            JointAngle::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            JointAngle::RightKnee => (RightHip, RightKnee, RightAnkle),
            JointAngle::TorsoLeft => (LeftShoulder, LeftHip, RightHip),
            JointAngle::TorsoRight => (RightShoulder, RightHip, LeftHip),
        }
    }
}

/// Joint name to angle in degrees [0, 180].
///
/// A joint is absent from the map (not zero) when any of its defining
/// landmarks is missing or below the visibility floor.
pub type AngleSet = HashMap<JointAngle, f32>;

/// Extract the full angle vocabulary from a frame.
pub fn extract_angles(frame: &PoseFrame, visibility_floor: f32) -> AngleSet {
    let mut angles = AngleSet::with_capacity(JointAngle::ALL.len());

    for joint in JointAngle::ALL {
        let (a, vertex, c) = joint.triple();
        let (Some(a), Some(v), Some(c)) = (
            frame.visible(a, visibility_floor),
            frame.visible(vertex, visibility_floor),
            frame.visible(c, visibility_floor),
        ) else {
            continue;
        };

        angles.insert(joint, angle_at_vertex(&a.position, &v.position, &c.position));
    }

    angles
}
