//! Core divide-and-conquer construction
//!
//! Sorts sites by x, builds the diagram recursively by splitting the sites in half and
//! merging neighboring sub-diagrams along a bisector seam, then maps the result back to the
//! caller's site order.

mod builder;
mod hull;
mod merge;
mod sites;

pub use sites::{jitter_duplicates, random_sites, validate_sites};

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::face::FaceArena;

use builder::SubDiagram;

/// Build the faces and the clockwise hull of `sites`
///
/// Face `i` and every hull entry refer to `sites[i]`. Unless `presorted` is set the sites are
/// stably sorted by ascending x first.
///
/// # Errors
///
/// Returns `GenerationFailed` if `presorted` is set but the sites are out of order, or if a
/// merge cannot be completed (which only happens for inputs with shared coordinates).
pub(crate) fn construct(
    sites: &[DVec2],
    presorted: bool,
    parallel_threshold: usize,
) -> Result<(FaceArena, Vec<usize>)> {
    if presorted {
        if let Some(index) = sites.windows(2).position(|pair| pair[0].x > pair[1].x) {
            return Err(VoronoiError::GenerationFailed(format!(
                "sites {} and {} are not sorted by x",
                index,
                index + 1
            )));
        }
        let SubDiagram { faces, hull } = builder::divide_and_conquer(sites, parallel_threshold)?;
        return Ok((faces, hull));
    }

    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by(|&a, &b| sites[a].x.total_cmp(&sites[b].x));
    let sorted: Vec<DVec2> = order.iter().map(|&index| sites[index]).collect();

    let SubDiagram { mut faces, hull } = builder::divide_and_conquer(&sorted, parallel_threshold)?;
    faces.relabel(&order);
    let hull = hull.into_iter().map(|position| order[position]).collect();

    Ok((faces, hull))
}
