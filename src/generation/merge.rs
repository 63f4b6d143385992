//! Seam stitching
//!
//! After the two child arenas are absorbed into one, the faces of the left half still extend
//! across the gap into the right half and vice versa. The seam between the halves is a
//! y-monotone chain of bisector pieces, running from the top bridge pair down to the bottom
//! bridge pair. Walking it one face pair at a time, every piece is inserted as a pair of
//! mutually neighboring edges, which clips each face back to its own side of the seam.

use crate::error::{Result, VoronoiError};
use crate::face::{Crossing, EdgeId, FaceArena, FaceId, Mirror, Splice};
use crate::geometry::Line;

/// Faces of a left-half site and a right-half site joined by a hull bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bridge {
    pub(crate) left: FaceId,
    pub(crate) right: FaceId,
}

/// Which side of the seam moves to a new face after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Left,
    Right,
    Both,
}

/// Relative tolerance for two seam crossings landing on the same vertex
const TIE_TOLERANCE: f64 = 1e-9;

/// Stitch the left faces (`0..split`) to the right faces (`split..`) along the seam
///
/// `top` and `bottom` are the face pairs of the upper and lower hull bridges. The seam starts
/// as the bisector of the top pair, anchored at the midpoint of its two sites and heading
/// down. Every later piece is anchored at the vertex where the previous one ended, projected
/// onto the exact bisector so rounding errors do not drift along the seam.
///
/// At each step both current faces are asked where the seam leaves them; the crossing that
/// comes first ends the seam piece, and the face it belongs to is replaced by its neighbor
/// across that edge. Coinciding crossings (a vertex shared by four or more sites)
/// advance both sides. Once the current pair is the bottom pair, its bisector runs off to
/// infinity and the walk ends.
///
/// # Errors
///
/// Returns `GenerationFailed` if the walk leaves the expected half, finds no way down, or
/// takes more steps than the arena has faces.
pub(crate) fn stitch(faces: &mut FaceArena, top: Bridge, bottom: Bridge, split: usize) -> Result<()> {
    let mut left = top.left;
    let mut right = top.right;
    let mut left_entry: Option<EdgeId> = None;
    let mut right_entry: Option<EdgeId> = None;
    let mut anchor = (faces.site(left) + faces.site(right)) * 0.5;

    for _ in 0..=2 * faces.face_count() {
        let bisector = Line::perpendicular_bisector(faces.site(left), faces.site(right));
        let seam = bisector.with_anchor(bisector.project(anchor));

        if left == bottom.left && right == bottom.right {
            faces.insert_edge(
                left,
                seam,
                right,
                Splice::Between {
                    before: left_entry,
                    after: None,
                },
                Mirror::Insert(Splice::Between {
                    before: None,
                    after: right_entry,
                }),
            );
            return Ok(());
        }

        let left_exit = faces.clip(left, &seam, left_entry).end;
        let right_exit = faces.clip(right, &seam, right_entry).end;
        let (advance, distance) = choose_advance(left_exit, right_exit).ok_or_else(|| {
            VoronoiError::GenerationFailed(format!(
                "seam between faces {} and {} never reaches the bottom bridge",
                left, right
            ))
        })?;

        let left_edge = faces.insert_edge(
            left,
            seam,
            right,
            Splice::Between {
                before: left_entry,
                after: left_exit.map(|exit| exit.edge),
            },
            Mirror::Insert(Splice::Between {
                before: right_exit.map(|exit| exit.edge),
                after: right_entry,
            }),
        );
        let right_edge = faces.neighbor(left_edge);

        anchor = seam.point_at(distance);
        left_entry = Some(left_edge);
        right_entry = right_edge;

        if matches!(advance, Advance::Left | Advance::Both) {
            let (face, entry) = cross_over(faces, left_exit)?;
            if face >= split {
                return Err(crossed_seam(left, face));
            }
            left = face;
            left_entry = Some(entry);
        }
        if matches!(advance, Advance::Right | Advance::Both) {
            let (face, entry) = cross_over(faces, right_exit)?;
            if face < split {
                return Err(crossed_seam(right, face));
            }
            right = face;
            right_entry = Some(entry);
        }
    }

    Err(VoronoiError::GenerationFailed(format!(
        "seam walk did not reach faces {} and {}",
        bottom.left, bottom.right
    )))
}

/// Pick the side whose crossing comes first along the seam, and the distance to it
fn choose_advance(left: Option<Crossing>, right: Option<Crossing>) -> Option<(Advance, f64)> {
    match (left, right) {
        (None, None) => None,
        (Some(left), None) => Some((Advance::Left, left.distance)),
        (None, Some(right)) => Some((Advance::Right, right.distance)),
        (Some(left), Some(right)) => {
            let scale = 1.0_f64.max(left.distance.abs()).max(right.distance.abs());
            if (left.distance - right.distance).abs() <= TIE_TOLERANCE * scale {
                Some((Advance::Both, (left.distance + right.distance) * 0.5))
            } else if left.distance < right.distance {
                Some((Advance::Left, left.distance))
            } else {
                Some((Advance::Right, right.distance))
            }
        }
    }
}

/// The face across an exit edge, and the mirror edge the seam enters it through
fn cross_over(faces: &FaceArena, exit: Option<Crossing>) -> Result<(FaceId, EdgeId)> {
    let exit = exit.ok_or_else(|| {
        VoronoiError::GenerationFailed("seam advanced through a missing edge".to_string())
    })?;
    let entry = faces.neighbor(exit.edge).ok_or_else(|| {
        VoronoiError::GenerationFailed(format!(
            "edge {} has no neighbor to cross into",
            exit.edge.index()
        ))
    })?;
    Ok((faces.face_of(entry), entry))
}

fn crossed_seam(from: FaceId, to: FaceId) -> VoronoiError {
    VoronoiError::GenerationFailed(format!(
        "seam crossed from face {} into face {} on the other half",
        from, to
    ))
}
