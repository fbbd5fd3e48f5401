//! Geometric utilities for 2D landmark computations.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::types::Position2D;

/// Axis-aligned bounding box in 2D image space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub min: Position2D,
    pub max: Position2D,
}

impl BoundingBox2D {
    pub fn new(min: Position2D, max: Position2D) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Position2D]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            min: Position2D::new(min_x, min_y),
            max: Position2D::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position2D {
        Position2D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, point: &Position2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Unweighted centroid of a point set
pub fn centroid(points: &[Position2D]) -> Option<Position2D> {
    if points.is_empty() {
        return None;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for p in points {
        sum_x += p.x;
        sum_y += p.y;
    }

    let n = points.len() as f32;
    Some(Position2D::new(sum_x / n, sum_y / n))
}

/// Midpoint between two positions
pub fn midpoint(a: &Position2D, b: &Position2D) -> Position2D {
    Position2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Calculate angle between two vectors in radians
pub fn angle_between(v1: &Vector2<f32>, v2: &Vector2<f32>) -> f32 {
    let dot = v1.dot(v2);
    let norms = v1.norm() * v2.norm();
    if norms < 1e-10 {
        0.0
    } else {
        (dot / norms).clamp(-1.0, 1.0).acos()
    }
}

/// Angle at `vertex` between rays toward `a` and `c`, in degrees [0, 180].
///
/// Uses the two-argument arctangent difference with a 360° fold-back, so the
/// result is invariant under uniform translation and positive scaling of the
/// input coordinates. Coincident points yield 0.
pub fn angle_at_vertex(a: &Position2D, vertex: &Position2D, c: &Position2D) -> f32 {
    let theta_a = (a.y - vertex.y).atan2(a.x - vertex.x);
    let theta_c = (c.y - vertex.y).atan2(c.x - vertex.x);

    let mut degrees = (theta_c - theta_a).to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_points() {
        let points = [
            Position2D::new(0.1, 0.9),
            Position2D::new(0.5, 0.2),
            Position2D::new(0.3, 0.4),
        ];
        let bbox = BoundingBox2D::from_points(&points).unwrap();

        assert!((bbox.min.x - 0.1).abs() < 1e-6);
        assert!((bbox.max.y - 0.9).abs() < 1e-6);
        assert!(bbox.contains(&Position2D::new(0.3, 0.5)));
        assert!(!bbox.contains(&Position2D::new(0.6, 0.5)));
    }

    #[test]
    fn test_centroid() {
        let points = [
            Position2D::new(0.0, 0.0),
            Position2D::new(1.0, 0.0),
            Position2D::new(1.0, 1.0),
            Position2D::new(0.0, 1.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.x - 0.5).abs() < 1e-6);
        assert!((c.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_angle_straight_line() {
        let a = Position2D::new(0.0, 0.0);
        let v = Position2D::new(0.5, 0.0);
        let c = Position2D::new(1.0, 0.0);
        assert!((angle_at_vertex(&a, &v, &c) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_right_angle() {
        let a = Position2D::new(0.0, 0.0);
        let v = Position2D::new(0.5, 0.0);
        let c = Position2D::new(0.5, 0.5);
        assert!((angle_at_vertex(&a, &v, &c) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_fold_back() {
        // Reflex configuration must fold back below 180
        let a = Position2D::new(1.0, 0.1);
        let v = Position2D::new(0.0, 0.0);
        let c = Position2D::new(1.0, -0.1);
        let angle = angle_at_vertex(&a, &v, &c);
        assert!(angle < 180.0);
        assert!(angle > 0.0);
    }

    #[test]
    fn test_angle_coincident_points() {
        let p = Position2D::new(0.5, 0.5);
        assert_eq!(angle_at_vertex(&p, &p, &p), 0.0);
    }

    #[test]
    fn test_angle_scale_translation_invariant() {
        let a = Position2D::new(0.2, 0.3);
        let v = Position2D::new(0.5, 0.5);
        let c = Position2D::new(0.9, 0.4);
        let base = angle_at_vertex(&a, &v, &c);

        let transform =
            |p: &Position2D| Position2D::new(p.x * 3.7 + 12.0, p.y * 3.7 - 4.0);
        let scaled = angle_at_vertex(&transform(&a), &transform(&v), &transform(&c));

        assert!((base - scaled).abs() < 1e-3);
    }
}
