//! Voronoi Cell Snapshot
//!
//! An owned copy of one face of a diagram: its site, its neighbors and its corners.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::face::FaceHandle;
use crate::geometry::cross;

/// A single region of a Voronoi diagram, detached from the diagram
///
/// Each cell holds:
/// - The index of its site (and of the face it was copied from)
/// - The site position
/// - Neighbor connectivity for graph walks
/// - The finite corners of the region, for rendering
///
/// Cells near the convex hull of the sites are unbounded. Their `vertices` only list the
/// finite corners, from the corner after the incoming infinite edge to the corner before
/// the outgoing one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the generating site (0 to face_count-1)
    pub id: usize,

    /// The generating site
    pub site: DVec2,

    /// IDs of adjacent cells, in boundary order
    ///
    /// Cells are neighbors if they share an edge of the diagram. Cells that only touch at a
    /// vertex are not neighbors.
    pub neighbors: Vec<usize>,

    /// Finite corners of the region in clockwise screen order (y down)
    pub vertices: Vec<DVec2>,

    /// Whether the region is a closed polygon
    pub bounded: bool,
}

impl VoronoiCell {
    /// Create a new Voronoi cell
    ///
    /// This is typically called by the diagram, not by user code.
    pub fn new(
        id: usize,
        site: DVec2,
        neighbors: Vec<usize>,
        vertices: Vec<DVec2>,
        bounded: bool,
    ) -> Self {
        Self {
            id,
            site,
            neighbors,
            vertices,
            bounded,
        }
    }

    pub(crate) fn from_face(face: &FaceHandle<'_>) -> Self {
        Self::new(
            face.index(),
            face.site(),
            face.neighbors(),
            face.vertices(),
            face.is_bounded(),
        )
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains(&other_cell_id)
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// Area of the region, or `None` for an unbounded region
    ///
    /// Shoelace formula over the corners.
    pub fn area(&self) -> Option<f64> {
        if !self.bounded {
            return None;
        }
        if self.vertices.len() < 3 {
            return Some(0.0);
        }

        let count = self.vertices.len();
        let twice_area: f64 = (0..count)
            .map(|i| cross(self.vertices[i], self.vertices[(i + 1) % count]))
            .sum();

        Some(twice_area.abs() * 0.5)
    }

    /// Euclidean distance between the two sites
    pub fn distance_to(&self, other: &VoronoiCell) -> f64 {
        self.site.distance(other.site)
    }
}
