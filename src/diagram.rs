//! VoronoiDiagram main structure

use glam::DVec2;
use std::collections::HashSet;
use std::time::Instant;

use crate::cell::VoronoiCell;
use crate::config::{DiagramConfig, DuplicatePolicy, DEFAULT_PARALLEL_THRESHOLD};
use crate::error::{Result, VoronoiError};
use crate::face::{FaceArena, FaceHandle};
use crate::generation::{self, jitter_duplicates, validate_sites};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A planar Voronoi diagram
///
/// Owns every face and edge. Face `i` is the region of `sites()[i]`: the set of points no
/// farther from that site than from any other. Faces are exposed through read-only
/// [`FaceHandle`]s; owned copies are available as [`VoronoiCell`]s.
///
/// # Examples
///
/// ```
/// use rust_voronoi_planar::*;
///
/// let sites = vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(10.0, 0.0),
///     DVec2::new(5.0, 10.0),
/// ];
/// let diagram = VoronoiDiagram::build(sites, false).unwrap();
///
/// assert_eq!(diagram.face_count(), 3);
/// let face = diagram.face(0).unwrap();
/// assert_eq!(face.edge_count(), 2);
///
/// // All three regions meet at the circumcenter.
/// let corner = face.vertices()[0];
/// assert!((corner - DVec2::new(5.0, 3.75)).length() < 1e-9);
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Sites in caller order (after jitter, if any)
    sites: Vec<DVec2>,

    /// Face and edge storage, face index == site index
    faces: FaceArena,

    /// Clockwise convex hull of the sites, as site indices
    hull: Vec<usize>,

    /// Nearest-site index for point location (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl VoronoiDiagram {
    /// Build the diagram of `sites` without checking them
    ///
    /// The sites must be finite with pairwise distinct x and y coordinates. Inputs that break
    /// this may still produce a diagram (four co-circular sites on a square work), but the
    /// result is not guaranteed; use [`generate`](Self::generate) for untrusted input.
    ///
    /// # Arguments
    ///
    /// * `sites` - Site positions; face `i` will belong to `sites[i]`
    /// * `presorted` - The sites are already sorted by ascending x
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if a merge step cannot be completed.
    pub fn build(sites: Vec<DVec2>, presorted: bool) -> Result<Self> {
        Self::assemble(sites, presorted, DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Validate or repair `sites` according to `config`, then build the diagram
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_planar::*;
    ///
    /// let config = DiagramConfigBuilder::new()
    ///     .seed(42)
    ///     .duplicates(DuplicatePolicy::Jitter { max_offset: 0.01 })
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// // A grid shares coordinates everywhere; jitter separates them.
    /// let sites: Vec<DVec2> = (0..4)
    ///     .flat_map(|i| (0..4).map(move |j| DVec2::new(i as f64, j as f64)))
    ///     .collect();
    /// let diagram = VoronoiDiagram::generate(sites, &config).unwrap();
    /// assert_eq!(diagram.face_count(), 16);
    /// ```
    ///
    /// # Errors
    ///
    /// - `NonFiniteSite` if a site has a NaN or infinite coordinate
    /// - `DegenerateInput` if sites share a coordinate under [`DuplicatePolicy::Reject`], or
    ///   could not be separated under [`DuplicatePolicy::Jitter`]
    /// - `GenerationFailed` if a merge step cannot be completed
    pub fn generate(mut sites: Vec<DVec2>, config: &DiagramConfig) -> Result<Self> {
        let start = Instant::now();
        let mut presorted = config.presorted;

        match config.duplicates {
            DuplicatePolicy::Reject => validate_sites(&sites)?,
            DuplicatePolicy::Jitter { max_offset } => {
                if let Some(index) = sites.iter().position(|site| !site.is_finite()) {
                    return Err(VoronoiError::NonFiniteSite(index));
                }
                let moved = jitter_duplicates(&mut sites, max_offset, config.seed);
                if moved > 0 {
                    presorted = false;
                    if config.verbose {
                        eprintln!("[Voronoi] Jittered {} of {} sites", moved, sites.len());
                    }
                }
                validate_sites(&sites)?;
            }
            DuplicatePolicy::Unchecked => {}
        }

        let diagram = Self::assemble(sites, presorted, config.parallel_threshold)?;

        if config.verbose {
            eprintln!(
                "[Voronoi] Built {} faces, hull of {}, total={:?}",
                diagram.face_count(),
                diagram.hull.len(),
                start.elapsed()
            );
        }

        Ok(diagram)
    }

    fn assemble(sites: Vec<DVec2>, presorted: bool, parallel_threshold: usize) -> Result<Self> {
        let (faces, hull) = generation::construct(&sites, presorted, parallel_threshold)?;

        #[cfg(feature = "spatial-index")]
        let spatial_index = if sites.is_empty() {
            None
        } else {
            Some(SpatialIndex::new(&sites))
        };

        Ok(Self {
            sites,
            faces,
            hull,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the number of faces (one per site)
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.face_count()
    }

    /// Get a read-only view of one face
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_planar::*;
    /// # let diagram = VoronoiDiagram::build(vec![DVec2::new(0.0, 0.0), DVec2::new(4.0, 1.0)], false).unwrap();
    /// let face = diagram.face(0).unwrap();
    /// for edge in face.edges() {
    ///     println!("{:?} borders face {:?}", edge, edge.neighbor_face());
    /// }
    /// assert!(diagram.face(2).is_none());
    /// ```
    pub fn face(&self, index: usize) -> Option<FaceHandle<'_>> {
        (index < self.face_count()).then(|| FaceHandle::new(&self.faces, index))
    }

    /// Iterate over all faces in site order
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle<'_>> + '_ {
        (0..self.face_count()).map(move |index| FaceHandle::new(&self.faces, index))
    }

    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    /// Site indices on the convex hull, clockwise (y down), as a cyclic sequence
    ///
    /// Sites lying in the middle of a straight hull edge are not included.
    #[inline]
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    /// Positions of the hull sites, in hull order
    pub fn hull_points(&self) -> Vec<DVec2> {
        self.hull.iter().map(|&index| self.sites[index]).collect()
    }

    /// Get neighbor IDs for a face
    ///
    /// Returns an empty vec if the index is invalid.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.face(index)
            .map(|face| face.neighbors())
            .unwrap_or_default()
    }

    /// Owned snapshot of one face
    ///
    /// # Errors
    ///
    /// Returns `FaceNotFound` if the index is out of bounds.
    pub fn cell(&self, index: usize) -> Result<VoronoiCell> {
        self.face(index)
            .map(|face| VoronoiCell::from_face(&face))
            .ok_or(VoronoiError::FaceNotFound(index))
    }

    /// Owned snapshots of all faces, in site order
    pub fn cells(&self) -> Vec<VoronoiCell> {
        self.faces().map(|face| VoronoiCell::from_face(&face)).collect()
    }

    /// Find the face containing a point (requires spatial-index feature)
    ///
    /// Returns `None` only for an empty diagram. Points on a boundary resolve to either face.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_planar::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let diagram = VoronoiDiagram::build(vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 1.0)], false).unwrap();
    /// assert_eq!(diagram.find_face_at(DVec2::new(2.0, 5.0)), Some(0));
    /// assert_eq!(diagram.find_face_at(DVec2::new(8.0, -5.0)), Some(1));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_face_at(&self, point: DVec2) -> Option<usize> {
        self.spatial_index
            .as_ref()
            .map(|index| index.find_nearest(point))
    }

    /// Find faces within a given hop count from a center face (BFS)
    ///
    /// # Arguments
    ///
    /// * `center` - Starting face index
    /// * `hops` - Maximum number of face hops (0 = just the center face)
    ///
    /// # Returns
    ///
    /// Face indices within range, including the center face, in no particular order.
    /// Returns an empty vec if `center` is invalid.
    pub fn find_faces_within_hops(&self, center: usize, hops: usize) -> Vec<usize> {
        if center >= self.face_count() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center];
        visited.insert(center);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &face in &current {
                for neighbor in self.neighbors(face) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        visited.into_iter().collect()
    }
}

impl std::fmt::Debug for VoronoiDiagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoronoiDiagram")
            .field("faces", &self.face_count())
            .field("hull", &self.hull)
            .finish()
    }
}
