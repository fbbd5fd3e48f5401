//! Fundamental types for the PoseMatch engine.

use chrono::Utc;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis * 1_000_000)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        self.0 / 1_000_000
    }

    /// Elapsed milliseconds since an earlier timestamp
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0) / 1_000_000
    }
}

/// 2D position in detector image coordinates (pixel or normalized-image space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f32,
    pub y: f32,
}

impl Position2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn to_nalgebra(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: Point2<f32>) -> Self {
        Self::new(p.x, p.y)
    }

    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 33-point skeletal landmark scheme (BlazePose full-body topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Landmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Landmark {
    pub const COUNT: usize = 33;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEyeInner),
            2 => Some(Self::LeftEye),
            3 => Some(Self::LeftEyeOuter),
            4 => Some(Self::RightEyeInner),
            5 => Some(Self::RightEye),
            6 => Some(Self::RightEyeOuter),
            7 => Some(Self::LeftEar),
            8 => Some(Self::RightEar),
            9 => Some(Self::MouthLeft),
            10 => Some(Self::MouthRight),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            17 => Some(Self::LeftPinky),
            18 => Some(Self::RightPinky),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            21 => Some(Self::LeftThumb),
            22 => Some(Self::RightThumb),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            29 => Some(Self::LeftHeel),
            30 => Some(Self::RightHeel),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }

    /// The four torso landmarks anchoring body-centric normalization
    pub fn torso() -> &'static [Landmark] {
        &[
            Landmark::LeftShoulder,
            Landmark::RightShoulder,
            Landmark::LeftHip,
            Landmark::RightHip,
        ]
    }

    /// Returns skeleton connectivity pairs for visualization
    pub fn skeleton_pairs() -> &'static [(Landmark, Landmark)] {
        &[
            (Landmark::LeftAnkle, Landmark::LeftKnee),
            (Landmark::LeftKnee, Landmark::LeftHip),
            (Landmark::RightAnkle, Landmark::RightKnee),
            (Landmark::RightKnee, Landmark::RightHip),
            (Landmark::LeftHip, Landmark::RightHip),
            (Landmark::LeftShoulder, Landmark::LeftHip),
            (Landmark::RightShoulder, Landmark::RightHip),
            (Landmark::LeftShoulder, Landmark::RightShoulder),
            (Landmark::LeftShoulder, Landmark::LeftElbow),
            (Landmark::RightShoulder, Landmark::RightElbow),
            (Landmark::LeftElbow, Landmark::LeftWrist),
            (Landmark::RightElbow, Landmark::RightWrist),
            (Landmark::LeftWrist, Landmark::LeftIndex),
            (Landmark::RightWrist, Landmark::RightIndex),
            (Landmark::LeftAnkle, Landmark::LeftHeel),
            (Landmark::RightAnkle, Landmark::RightHeel),
            (Landmark::LeftHeel, Landmark::LeftFootIndex),
            (Landmark::RightHeel, Landmark::RightFootIndex),
            (Landmark::Nose, Landmark::LeftEye),
            (Landmark::Nose, Landmark::RightEye),
            (Landmark::LeftEye, Landmark::LeftEar),
            (Landmark::RightEye, Landmark::RightEar),
        ]
    }
}

/// Landmark detection with confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDetection {
    pub landmark: Landmark,
    pub position: Position2D,
    pub confidence: f32,
}

impl LandmarkDetection {
    pub fn new(landmark: Landmark, position: Position2D, confidence: f32) -> Self {
        Self {
            landmark,
            position,
            confidence,
        }
    }
}

/// Complete set of landmarks from one detector invocation.
///
/// Missing or undetected landmarks are `None`; a detection is never silently
/// defaulted to the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    pub timestamp: Timestamp,
    #[serde(with = "landmark_array")]
    pub landmarks: [Option<LandmarkDetection>; Landmark::COUNT],
}

impl PoseFrame {
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            landmarks: [None; Landmark::COUNT],
        }
    }

    /// Build a frame from a detector's index-stable `(x, y, confidence)` list.
    ///
    /// The slice must cover the full landmark scheme; a different length is a
    /// host wiring error, caught once at the boundary rather than per frame.
    pub fn from_points(timestamp: Timestamp, points: &[(f32, f32, f32)]) -> Result<Self> {
        if points.len() != Landmark::COUNT {
            return Err(Error::SchemeMismatch {
                expected: Landmark::COUNT,
                actual: points.len(),
            });
        }

        let mut frame = Self::empty(timestamp);
        for (idx, &(x, y, confidence)) in points.iter().enumerate() {
            let landmark = Landmark::from_index(idx as u8).unwrap();
            frame.landmarks[idx] = Some(LandmarkDetection::new(
                landmark,
                Position2D::new(x, y),
                confidence,
            ));
        }
        Ok(frame)
    }

    pub fn get(&self, landmark: Landmark) -> Option<&LandmarkDetection> {
        self.landmarks[landmark as usize].as_ref()
    }

    pub fn set(&mut self, detection: LandmarkDetection) {
        self.landmarks[detection.landmark as usize] = Some(detection);
    }

    /// Landmark detection if present and at or above the confidence floor
    pub fn visible(&self, landmark: Landmark, floor: f32) -> Option<&LandmarkDetection> {
        self.get(landmark).filter(|d| d.confidence >= floor)
    }

    pub fn visible_count(&self, floor: f32) -> usize {
        self.detections().filter(|d| d.confidence >= floor).count()
    }

    pub fn detections(&self) -> impl Iterator<Item = &LandmarkDetection> {
        self.landmarks.iter().flatten()
    }
}

/// Serde support for the fixed-size landmark array (serde's derive stops at 32)
mod landmark_array {
    use super::{Landmark, LandmarkDetection};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        arr: &[Option<LandmarkDetection>; Landmark::COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(arr.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[Option<LandmarkDetection>; Landmark::COUNT], D::Error> {
        let vec: Vec<Option<LandmarkDetection>> = Vec::deserialize(deserializer)?;
        let len = vec.len();
        vec.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"exactly 33 landmark slots"))
    }
}

/// Canonical label for "no determination"
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Per-frame classification output surfaced to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// The canonical no-determination value
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LABEL, 0.0)
    }

    /// Unknown label carrying a diagnostic score (e.g. a rejected best match)
    pub fn unknown_with_score(confidence: f32) -> Self {
        Self::new(UNKNOWN_LABEL, confidence)
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_roundtrip() {
        for i in 0..33 {
            let lm = Landmark::from_index(i).unwrap();
            assert_eq!(lm as u8, i);
        }
        assert!(Landmark::from_index(33).is_none());
    }

    #[test]
    fn test_frame_from_points_scheme_check() {
        let short = vec![(0.0, 0.0, 1.0); 17];
        assert!(PoseFrame::from_points(Timestamp::from_nanos(0), &short).is_err());

        let full = vec![(0.5, 0.5, 0.9); Landmark::COUNT];
        let frame = PoseFrame::from_points(Timestamp::from_nanos(0), &full).unwrap();
        assert_eq!(frame.visible_count(0.3), Landmark::COUNT);
    }

    #[test]
    fn test_visible_respects_floor() {
        let mut frame = PoseFrame::empty(Timestamp::from_nanos(0));
        frame.set(LandmarkDetection::new(
            Landmark::Nose,
            Position2D::new(0.5, 0.2),
            0.2,
        ));

        assert!(frame.visible(Landmark::Nose, 0.3).is_none());
        assert!(frame.visible(Landmark::Nose, 0.1).is_some());
        assert!(frame.visible(Landmark::LeftHip, 0.0).is_none());
    }

    #[test]
    fn test_frame_serde_roundtrip() {
        let points = vec![(0.25, 0.75, 0.8); Landmark::COUNT];
        let frame = PoseFrame::from_points(Timestamp::from_millis(42), &points).unwrap();

        let json = serde_json::to_string(&frame).unwrap();
        let back: PoseFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp, frame.timestamp);
        assert_eq!(back.visible_count(0.0), Landmark::COUNT);
    }

    #[test]
    fn test_classification_result_unknown() {
        let r = ClassificationResult::unknown();
        assert!(r.is_unknown());
        assert_eq!(r.confidence, 0.0);
    }
}
