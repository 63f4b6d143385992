//! Recursive divide-and-conquer construction
//!
//! Sites arrive sorted by ascending x. Each call splits them in half, builds both halves
//! independently, and merges the results: hull bridges first, then the merged hull, then the
//! seam that clips the two sets of faces against each other.

use glam::DVec2;

use crate::error::Result;
use crate::face::{FaceArena, Mirror, Splice};
use crate::geometry::Line;

use super::hull::{self, Cap, Ring};
use super::merge::{self, Bridge};

/// A finished diagram over a contiguous run of sorted sites
///
/// Face `i` and hull entries refer to the `i`-th site of that run.
#[derive(Debug, Clone)]
pub(crate) struct SubDiagram {
    pub(crate) faces: FaceArena,
    /// Clockwise convex hull as site indices
    pub(crate) hull: Vec<usize>,
}

/// Build the diagram of `sites`, which must be sorted by x with distinct coordinates
///
/// With the `parallel` feature, both halves of a sub-problem with at least
/// `parallel_threshold` sites are built concurrently.
pub(crate) fn divide_and_conquer(sites: &[DVec2], parallel_threshold: usize) -> Result<SubDiagram> {
    match sites.len() {
        0 | 1 => Ok(SubDiagram {
            faces: FaceArena::with_sites(sites),
            hull: (0..sites.len()).collect(),
        }),
        2 => {
            let mut faces = FaceArena::with_sites(sites);
            faces.insert_edge(
                0,
                Line::perpendicular_bisector(sites[0], sites[1]),
                1,
                Splice::Locate,
                Mirror::Insert(Splice::Locate),
            );
            Ok(SubDiagram {
                faces,
                hull: vec![0, 1],
            })
        }
        count => {
            let split = count / 2;
            let (left, right) = build_halves(&sites[..split], &sites[split..], parallel_threshold)?;
            merge_halves(sites, split, left, right)
        }
    }
}

#[cfg(feature = "parallel")]
fn build_halves(
    left: &[DVec2],
    right: &[DVec2],
    parallel_threshold: usize,
) -> Result<(SubDiagram, SubDiagram)> {
    if left.len() + right.len() >= parallel_threshold {
        let (left, right) = rayon::join(
            || divide_and_conquer(left, parallel_threshold),
            || divide_and_conquer(right, parallel_threshold),
        );
        return Ok((left?, right?));
    }

    Ok((
        divide_and_conquer(left, parallel_threshold)?,
        divide_and_conquer(right, parallel_threshold)?,
    ))
}

#[cfg(not(feature = "parallel"))]
fn build_halves(
    left: &[DVec2],
    right: &[DVec2],
    parallel_threshold: usize,
) -> Result<(SubDiagram, SubDiagram)> {
    Ok((
        divide_and_conquer(left, parallel_threshold)?,
        divide_and_conquer(right, parallel_threshold)?,
    ))
}

/// Merge the sub-diagrams of `sites[..split]` and `sites[split..]`
///
/// Takes ownership of both children; the right arena is moved into the left one.
fn merge_halves(
    sites: &[DVec2],
    split: usize,
    left: SubDiagram,
    right: SubDiagram,
) -> Result<SubDiagram> {
    let SubDiagram {
        mut faces,
        hull: left_hull,
    } = left;
    let SubDiagram {
        faces: right_faces,
        hull: right_hull,
    } = right;

    let left_ring = Ring::new(&left_hull, &sites[..split]);
    let right_ring = Ring::new(&right_hull, &sites[split..]);

    let top = hull::find_cap(&left_ring, &right_ring, Cap::Top)?;
    let bottom = hull::find_cap(&left_ring, &right_ring, Cap::Bottom)?;

    let merged_hull = hull::splice(
        &left_ring,
        &right_ring,
        split,
        hull::extend_collinear(&left_ring, &right_ring, top, Cap::Top),
        hull::extend_collinear(&left_ring, &right_ring, bottom, Cap::Bottom),
    );

    let top = Bridge {
        left: left_ring.site_index(top.left),
        right: split + right_ring.site_index(top.right),
    };
    let bottom = Bridge {
        left: left_ring.site_index(bottom.left),
        right: split + right_ring.site_index(bottom.right),
    };

    faces.absorb(right_faces);
    merge::stitch(&mut faces, top, bottom, split)?;

    Ok(SubDiagram {
        faces,
        hull: merged_hull,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceHandle;

    fn sorted(mut sites: Vec<DVec2>) -> Vec<DVec2> {
        sites.sort_by(|a, b| a.x.total_cmp(&b.x));
        sites
    }

    #[test]
    fn test_empty_and_single() {
        let empty = divide_and_conquer(&[], 16).unwrap();
        assert_eq!(empty.faces.face_count(), 0);
        assert!(empty.hull.is_empty());

        let single = divide_and_conquer(&[DVec2::new(3.0, 4.0)], 16).unwrap();
        assert_eq!(single.faces.face_count(), 1);
        assert_eq!(single.hull, vec![0]);
        assert!(FaceHandle::new(&single.faces, 0).is_empty());
    }

    #[test]
    fn test_pair_shares_one_bisector() {
        let sites = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 2.0)];
        let diagram = divide_and_conquer(&sites, 16).unwrap();

        assert_eq!(diagram.hull, vec![0, 1]);
        for index in 0..2 {
            let face = FaceHandle::new(&diagram.faces, index);
            assert_eq!(face.edge_count(), 1);
            assert_eq!(face.neighbors(), vec![1 - index]);
            assert!(face.first_edge().line().unwrap().to_the_left(sites[index]));
        }
    }

    #[test]
    fn test_three_sites_meet_at_circumcenter() {
        let sites = sorted(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 10.0),
        ]);
        let diagram = divide_and_conquer(&sites, 16).unwrap();

        // Sorted: (0, 0), (5, 10), (10, 0)
        assert_eq!(diagram.hull, vec![0, 2, 1]);
        for index in 0..3 {
            let face = FaceHandle::new(&diagram.faces, index);
            assert_eq!(face.edge_count(), 2);
            let vertices = face.vertices();
            assert_eq!(vertices.len(), 1);
            assert!((vertices[0] - DVec2::new(5.0, 3.75)).length() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_sites_form_strips() {
        let sites = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        ];
        let diagram = divide_and_conquer(&sites, 16).unwrap();

        assert_eq!(diagram.hull, vec![0, 2]);
        let middle = FaceHandle::new(&diagram.faces, 1);
        assert_eq!(middle.edge_count(), 2);
        assert!(middle.vertices().is_empty());
        let mut neighbors = middle.neighbors();
        neighbors.sort();
        assert_eq!(neighbors, vec![0, 2]);

        assert_eq!(FaceHandle::new(&diagram.faces, 0).neighbors(), vec![1]);
        assert_eq!(FaceHandle::new(&diagram.faces, 2).neighbors(), vec![1]);
    }

    #[test]
    fn test_bounded_center_face() {
        let sites = sorted(vec![
            DVec2::new(0.0, 1.0),
            DVec2::new(2.1, 2.9),
            DVec2::new(4.2, 0.2),
            DVec2::new(6.3, 4.1),
            DVec2::new(4.4, 8.3),
            DVec2::new(-1.5, 6.7),
            DVec2::new(2.6, 4.4),
        ]);
        let diagram = divide_and_conquer(&sites, 16).unwrap();

        let center = sites
            .iter()
            .position(|site| *site == DVec2::new(2.6, 4.4))
            .unwrap();
        let face = FaceHandle::new(&diagram.faces, center);
        assert!(face.is_bounded());
        assert!(!diagram.hull.contains(&center));
        for edge in face.edges() {
            assert!(edge.line().unwrap().to_the_left(sites[center]));
        }
    }
}
