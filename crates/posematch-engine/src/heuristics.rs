//! Hand-authored angle-range rules.
//!
//! Bootstrap path for poses that lack a clean reference exemplar: a rule
//! names a pose and the joint-angle ranges that must all hold. The matcher
//! consults rules only after no catalog entry clears the acceptance
//! threshold; the catalog stays the primary signal.

use serde::{Deserialize, Serialize};

use crate::angles::{AngleSet, JointAngle};

/// Inclusive angle range a single joint must fall within, in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AngleRange {
    pub joint: JointAngle,
    pub min_deg: f32,
    pub max_deg: f32,
}

impl AngleRange {
    pub fn new(joint: JointAngle, min_deg: f32, max_deg: f32) -> Self {
        Self {
            joint,
            min_deg,
            max_deg,
        }
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min_deg && angle <= self.max_deg
    }
}

/// A named pose described by joint-angle predicates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicRule {
    pub label: String,
    pub ranges: Vec<AngleRange>,
}

impl HeuristicRule {
    pub fn new(label: impl Into<String>, ranges: Vec<AngleRange>) -> Self {
        Self {
            label: label.into(),
            ranges,
        }
    }

    /// True only if every predicate joint is present and within range.
    /// An absent joint fails the rule; there is no partial credit.
    pub fn matches(&self, angles: &AngleSet) -> bool {
        !self.ranges.is_empty()
            && self
                .ranges
                .iter()
                .all(|r| angles.get(&r.joint).is_some_and(|&a| r.contains(a)))
    }
}
