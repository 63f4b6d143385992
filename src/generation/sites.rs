//! Site preparation
//!
//! The merge step needs every site to have a unique x and a unique y coordinate. These helpers
//! check that precondition, repair inputs that violate it, and produce random site sets that
//! satisfy it.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

use crate::error::{Axis, Result, VoronoiError};

/// Fraction of each dimension left empty on every side by [`random_sites`]
const RANDOM_MARGIN: f64 = 0.05;

/// A site that cannot be separated from the others after this many nudges is left in place
const MAX_NUDGES: usize = 64;

/// Check that every site is finite and that no two sites share an x or a y coordinate
///
/// # Errors
///
/// - `NonFiniteSite` for the first site with a NaN or infinite coordinate
/// - `DegenerateInput` naming two sites that share a coordinate (lower index first)
///
/// # Example
///
/// ```rust
/// use rust_voronoi_planar::*;
/// use rust_voronoi_planar::generation::validate_sites;
///
/// let sites = [DVec2::new(1.0, 2.0), DVec2::new(3.0, 2.0)];
/// assert!(matches!(
///     validate_sites(&sites),
///     Err(VoronoiError::DegenerateInput { axis: Axis::Y, .. })
/// ));
/// ```
pub fn validate_sites(sites: &[DVec2]) -> Result<()> {
    if let Some(index) = sites.iter().position(|site| !site.is_finite()) {
        return Err(VoronoiError::NonFiniteSite(index));
    }

    check_axis(sites, Axis::X)?;
    check_axis(sites, Axis::Y)
}

fn check_axis(sites: &[DVec2], axis: Axis) -> Result<()> {
    let coordinate = |index: usize| match axis {
        Axis::X => sites[index].x,
        Axis::Y => sites[index].y,
    };

    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by(|&a, &b| coordinate(a).total_cmp(&coordinate(b)));

    for pair in order.windows(2) {
        if coordinate(pair[0]) == coordinate(pair[1]) {
            return Err(VoronoiError::DegenerateInput {
                first: pair[0].min(pair[1]),
                second: pair[0].max(pair[1]),
                axis,
            });
        }
    }

    Ok(())
}

/// Nudge sites until no two share an x or a y coordinate
///
/// Sites are visited in order. Whenever a site collides with an earlier one on either axis, a
/// random offset in `[0, max_offset)` is added to both of its coordinates, repeatedly, until
/// it is unique. Non-finite sites are skipped.
///
/// # Arguments
///
/// * `sites` - Sites to repair in place
/// * `max_offset` - Largest offset added per nudge
/// * `seed` - Random seed; the same inputs always produce the same output
///
/// # Returns
///
/// The number of sites that were moved
///
/// # Example
///
/// ```rust
/// use rust_voronoi_planar::*;
/// use rust_voronoi_planar::generation::{jitter_duplicates, validate_sites};
///
/// let mut sites = vec![DVec2::new(0.0, 0.0), DVec2::new(0.0, 5.0), DVec2::new(0.0, 9.0)];
/// let moved = jitter_duplicates(&mut sites, 0.5, 7);
///
/// assert_eq!(moved, 2);
/// assert!(validate_sites(&sites).is_ok());
/// ```
pub fn jitter_duplicates(sites: &mut [DVec2], max_offset: f64, seed: u32) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    nudge_collisions(sites, max_offset, &mut rng)
}

fn nudge_collisions<R: Rng>(sites: &mut [DVec2], max_offset: f64, rng: &mut R) -> usize {
    if !(max_offset.is_finite() && max_offset > 0.0) {
        return 0;
    }

    // Adding 0.0 folds -0.0 into 0.0 so both hash alike.
    let key = |value: f64| (value + 0.0).to_bits();

    let mut taken_x = HashSet::with_capacity(sites.len());
    let mut taken_y = HashSet::with_capacity(sites.len());
    let mut moved = 0;

    for site in sites.iter_mut() {
        if !site.is_finite() {
            continue;
        }

        let mut nudges = 0;
        while nudges < MAX_NUDGES
            && (taken_x.contains(&key(site.x)) || taken_y.contains(&key(site.y)))
        {
            site.x += rng.gen_range(0.0..max_offset);
            site.y += rng.gen_range(0.0..max_offset);
            nudges += 1;
        }

        taken_x.insert(key(site.x));
        taken_y.insert(key(site.y));
        if nudges > 0 {
            moved += 1;
        }
    }

    moved
}

/// Generate random sites inside a `width` x `height` rectangle
///
/// Sites keep a 5% margin from every edge of the rectangle. Sites sharing an x or y
/// coordinate are nudged apart, so in practice every coordinate is distinct; a site still
/// colliding after a bounded number of nudges is left where it is, and
/// [`validate_sites`] reports it.
///
/// # Arguments
///
/// * `count` - Number of sites
/// * `width` - Extent along x
/// * `height` - Extent along y
/// * `seed` - Random seed for deterministic placement
///
/// # Example
///
/// ```rust
/// use rust_voronoi_planar::generation::{random_sites, validate_sites};
///
/// let sites = random_sites(500, 800.0, 600.0, 42);
/// assert_eq!(sites.len(), 500);
/// assert!(validate_sites(&sites).is_ok());
/// ```
pub fn random_sites(count: usize, width: f64, height: f64, seed: u32) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let span = 1.0 - 2.0 * RANDOM_MARGIN;

    let mut sites: Vec<DVec2> = (0..count)
        .map(|_| {
            let x = (rng.gen::<f64>() * span + RANDOM_MARGIN) * width;
            let y = (rng.gen::<f64>() * span + RANDOM_MARGIN) * height;
            DVec2::new(x, y)
        })
        .collect();

    let nudge = width.abs().max(height.abs()).max(1.0) * 1e-9;
    nudge_collisions(&mut sites, nudge, &mut rng);

    sites
}
