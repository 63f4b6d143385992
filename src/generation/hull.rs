//! Convex hull bridges
//!
//! Each sub-diagram carries its convex hull as a clockwise ring of site indices. Merging two
//! sub-diagrams needs the two bridges (common tangents) across the gap between their hulls:
//! the top bridge is where the seam between the halves starts, the bottom bridge is where it
//! ends. The merged hull is then the two rings spliced together along those bridges.

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::geometry::orientation;

/// Relative tolerance of the tangency test
const TANGENT_TOLERANCE: f64 = 1e-12;

/// A clockwise hull ring over a slice of sites
pub(crate) struct Ring<'a> {
    order: &'a [usize],
    sites: &'a [DVec2],
}

impl<'a> Ring<'a> {
    /// `order` lists indices into `sites` in clockwise order
    pub(crate) fn new(order: &'a [usize], sites: &'a [DVec2]) -> Self {
        Self { order, sites }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Site index at a ring position
    #[inline]
    pub(crate) fn site_index(&self, position: usize) -> usize {
        self.order[position]
    }

    #[inline]
    fn point(&self, position: usize) -> DVec2 {
        self.sites[self.order[position]]
    }

    #[inline]
    fn step(&self, position: usize, delta: isize) -> usize {
        (position as isize + delta).rem_euclid(self.len() as isize) as usize
    }

    /// Ring position with the largest x (first one on ties)
    fn rightmost(&self) -> usize {
        let mut best = 0;
        for position in 1..self.len() {
            if self.point(position).x > self.point(best).x {
                best = position;
            }
        }
        best
    }

    /// Ring position with the smallest x (first one on ties)
    fn leftmost(&self) -> usize {
        let mut best = 0;
        for position in 1..self.len() {
            if self.point(position).x < self.point(best).x {
                best = position;
            }
        }
        best
    }
}

/// Which common tangent to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cap {
    /// Upper tangent (smallest y)
    Top,
    /// Lower tangent (largest y)
    Bottom,
}

impl Cap {
    /// Ring steps that walk the left and right hulls towards this cap
    fn steps(self) -> (isize, isize) {
        match self {
            Cap::Top => (-1, 1),
            Cap::Bottom => (1, -1),
        }
    }

    /// Whether `point` lies strictly outside the cap line `left -> right`
    fn beyond(self, left: DVec2, right: DVec2, point: DVec2) -> bool {
        let turn = orientation(left, right, point);
        let tolerance = TANGENT_TOLERANCE * left.distance(right) * left.distance(point);
        match self {
            Cap::Top => turn < -tolerance,
            Cap::Bottom => turn > tolerance,
        }
    }

    fn collinear(left: DVec2, right: DVec2, point: DVec2) -> bool {
        let tolerance = TANGENT_TOLERANCE * left.distance(right) * left.distance(point);
        orientation(left, right, point).abs() <= tolerance
    }
}

/// Ring positions of a tangent's endpoints on the left and right hull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HullBridge {
    pub(crate) left: usize,
    pub(crate) right: usize,
}

/// Find the common tangent of two hulls separated by a vertical line
///
/// Starts from the rightmost point of the left hull and the leftmost point of the right
/// hull, then alternately walks each side towards the cap while the next point lies beyond
/// the current tangent candidate. On collinear runs it stops at the first tangent point, so
/// the bridge joins the two sites closest to the gap.
pub(crate) fn find_cap(left: &Ring<'_>, right: &Ring<'_>, cap: Cap) -> Result<HullBridge> {
    let (left_step, right_step) = cap.steps();
    let mut l = left.rightmost();
    let mut r = right.leftmost();
    let mut budget = 2 * (left.len() + right.len());

    loop {
        let mut moved = false;

        while left.len() > 1 {
            let candidate = left.step(l, left_step);
            if !cap.beyond(left.point(l), right.point(r), left.point(candidate)) {
                break;
            }
            l = candidate;
            moved = true;
            budget = spend(budget, cap)?;
        }

        while right.len() > 1 {
            let candidate = right.step(r, right_step);
            if !cap.beyond(left.point(l), right.point(r), right.point(candidate)) {
                break;
            }
            r = candidate;
            moved = true;
            budget = spend(budget, cap)?;
        }

        if !moved {
            return Ok(HullBridge { left: l, right: r });
        }
    }
}

fn spend(budget: usize, cap: Cap) -> Result<usize> {
    budget.checked_sub(1).ok_or_else(|| {
        VoronoiError::GenerationFailed(format!("{:?} hull bridge search did not converge", cap))
    })
}

/// Move each end of a bridge onto the outermost of any collinear hull points
///
/// Hull points lying on the bridge would otherwise stay in the merged hull as redundant
/// vertices.
pub(crate) fn extend_collinear(
    left: &Ring<'_>,
    right: &Ring<'_>,
    bridge: HullBridge,
    cap: Cap,
) -> HullBridge {
    let (left_step, right_step) = cap.steps();
    let HullBridge {
        left: mut l,
        right: mut r,
    } = bridge;

    for _ in 1..left.len() {
        let candidate = left.step(l, left_step);
        let (from, to, point) = (left.point(l), right.point(r), left.point(candidate));
        if candidate == l
            || !Cap::collinear(from, to, point)
            || point.distance_squared(to) <= from.distance_squared(to)
        {
            break;
        }
        l = candidate;
    }

    for _ in 1..right.len() {
        let candidate = right.step(r, right_step);
        let (from, to, point) = (right.point(r), left.point(l), right.point(candidate));
        if candidate == r
            || !Cap::collinear(to, from, point)
            || point.distance_squared(to) <= from.distance_squared(to)
        {
            break;
        }
        r = candidate;
    }

    HullBridge { left: l, right: r }
}

/// Join two hull rings along their bridges into one clockwise ring
///
/// Walks the left ring from the bottom bridge to the top bridge, then the right ring from the
/// top bridge to the bottom bridge. Right-hand site indices are shifted by `offset`.
pub(crate) fn splice(
    left: &Ring<'_>,
    right: &Ring<'_>,
    offset: usize,
    top: HullBridge,
    bottom: HullBridge,
) -> Vec<usize> {
    let mut hull = Vec::with_capacity(left.len() + right.len());

    let mut position = bottom.left;
    for _ in 0..left.len() {
        hull.push(left.site_index(position));
        if position == top.left {
            break;
        }
        position = left.step(position, 1);
    }

    let mut position = top.right;
    for _ in 0..right.len() {
        hull.push(right.site_index(position) + offset);
        if position == bottom.right {
            break;
        }
        position = right.step(position, 1);
    }

    hull
}
