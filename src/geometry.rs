//! Line and point primitives
//!
//! Everything here is a pure function of its inputs. Coordinates are screen-space
//! (y grows downward) and a point is "left" of a line when the 2D cross product of the
//! line's direction and the vector from its anchor to the point is positive.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two unit directions whose cross product is below this are treated as parallel
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// 2D cross product (`a.x * b.y - a.y * b.x`)
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Signed area test for the triangle `a`, `b`, `p`
///
/// Positive when `p` lies left of the directed segment `a -> b`.
#[inline]
pub fn orientation(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    cross(b - a, p - a)
}

/// An oriented infinite line
///
/// The line bounds the half-plane on its left. For a Voronoi edge that half-plane is the
/// one containing the site whose region the edge belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    anchor: DVec2,
    direction: DVec2,
}

impl Line {
    /// Create a line through `anchor` heading along `direction`
    ///
    /// The direction is normalised. A zero direction stays zero and every intersection
    /// query against such a line reports "parallel".
    pub fn new(anchor: DVec2, direction: DVec2) -> Self {
        Self {
            anchor,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Line through two points, anchored at `start` and heading towards `end`
    pub fn through(start: DVec2, end: DVec2) -> Self {
        Self::new(start, end - start)
    }

    /// Perpendicular bisector of the segment from `a` to `b`
    ///
    /// Anchored at the midpoint and oriented so that `a` lies on the left.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_planar::{DVec2, Line};
    ///
    /// let a = DVec2::new(0.0, 0.0);
    /// let b = DVec2::new(10.0, 0.0);
    /// let bisector = Line::perpendicular_bisector(a, b);
    ///
    /// assert_eq!(bisector.anchor(), DVec2::new(5.0, 0.0));
    /// assert!(bisector.to_the_left(a));
    /// assert!(!bisector.to_the_left(b));
    /// ```
    pub fn perpendicular_bisector(a: DVec2, b: DVec2) -> Self {
        let midpoint = (a + b) * 0.5;
        Self::new(midpoint, (b - a).perp())
    }

    #[inline]
    pub fn anchor(&self) -> DVec2 {
        self.anchor
    }

    /// Unit direction of the line
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    /// Same anchor, opposite direction (swaps the bounded half-plane)
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            anchor: self.anchor,
            direction: -self.direction,
        }
    }

    /// Same direction, moved to a new anchor
    #[inline]
    pub fn with_anchor(&self, anchor: DVec2) -> Self {
        Self {
            anchor,
            direction: self.direction,
        }
    }

    /// Point at signed distance `t` from the anchor
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec2 {
        self.anchor + self.direction * t
    }

    /// Closest point on the line to `point`
    #[inline]
    pub fn project(&self, point: DVec2) -> DVec2 {
        self.point_at((point - self.anchor).dot(self.direction))
    }

    /// Signed side test, positive on the left
    #[inline]
    pub fn side(&self, point: DVec2) -> f64 {
        cross(self.direction, point - self.anchor)
    }

    /// Whether `point` lies strictly in the half-plane this line bounds
    #[inline]
    pub fn to_the_left(&self, point: DVec2) -> bool {
        self.side(point) > 0.0
    }

    /// Signed distance along `other`, from its anchor, to where `self` crosses it
    ///
    /// Returns `None` for parallel lines: there is no bounded intersection.
    pub fn intersection_distance_with(&self, other: &Line) -> Option<f64> {
        let denominator = cross(self.direction, other.direction);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }
        Some(cross(self.direction, self.anchor - other.anchor) / denominator)
    }

    /// The unique crossing point of two non-parallel lines
    pub fn intersection_with(&self, other: &Line) -> Option<DVec2> {
        self.intersection_distance_with(other)
            .map(|t| other.point_at(t))
    }
}
