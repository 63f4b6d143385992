//! Region boundaries
//!
//! Every site owns one face. A face stores its boundary as a circular, doubly-linked list of
//! edges held in a shared arena, so edges can point at their mirror in the neighboring face
//! without any ownership cycles. Edges are linked in clockwise order: the face interior is
//! always on the left of each edge's line.
//!
//! A face with no edges covers the whole plane. A face whose boundary is open has exactly
//! one gap, between the last edge of its chain (`next_intersects == false`) and the first
//! one (`prev_intersects == false`); the region runs off to infinity there.
//!
//! Mutation is crate-private. Outside code observes faces through [`FaceHandle`] and
//! [`EdgeCursor`], which only ever hand out copies.

use glam::DVec2;

use crate::geometry::{cross, Line, PARALLEL_EPSILON};

/// Relative slack before a last entry past the first exit counts as a miss
const MISS_TOLERANCE: f64 = 1e-9;

/// Index of a face; equal to the index of its generating site
pub type FaceId = usize;

/// Stable handle to an edge in a diagram's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Edge {
    line: Line,
    face: FaceId,
    prev: EdgeId,
    next: EdgeId,
    neighbor: Option<EdgeId>,
    prev_intersects: bool,
    next_intersects: bool,
}

#[derive(Debug, Clone)]
struct Face {
    site: DVec2,
    first_edge: Option<EdgeId>,
}

/// Where a boundary line crosses a face edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Crossing {
    pub(crate) edge: EdgeId,
    /// Signed distance along the query line, from its anchor
    pub(crate) distance: f64,
}

/// The two edges framing the arc of a face a line passes through
///
/// `start` is where the line enters the region, `end` where it leaves. Either side is
/// `None` when the region is unbounded in that direction along the line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EdgeRange {
    pub(crate) start: Option<Crossing>,
    pub(crate) end: Option<Crossing>,
}

/// Where to link a new edge into a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Splice {
    /// Find the positions with [`FaceArena::find_intersect_range`]
    Locate,
    /// Explicit neighbors; `None` leaves a gap on that side
    Between {
        before: Option<EdgeId>,
        after: Option<EdgeId>,
    },
}

/// How the mirror edge on the neighboring face is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mirror {
    /// Insert the reversed line into the neighbor face at the given position
    Insert(Splice),
    /// The mirror already exists; only record it
    Existing(EdgeId),
}

/// Arena owning every face and edge of a (sub-)diagram
#[derive(Debug, Clone, Default)]
pub(crate) struct FaceArena {
    faces: Vec<Face>,
    edges: Vec<Edge>,
}

impl FaceArena {
    /// One edgeless face per site, in order
    pub(crate) fn with_sites(sites: &[DVec2]) -> Self {
        Self {
            faces: sites
                .iter()
                .map(|&site| Face {
                    site,
                    first_edge: None,
                })
                .collect(),
            edges: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub(crate) fn site(&self, face: FaceId) -> DVec2 {
        self.faces[face].site
    }

    #[inline]
    pub(crate) fn first_edge(&self, face: FaceId) -> Option<EdgeId> {
        self.faces[face].first_edge
    }

    #[inline]
    pub(crate) fn face_of(&self, edge: EdgeId) -> FaceId {
        self.edges[edge.0].face
    }

    #[inline]
    pub(crate) fn neighbor(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edges[edge.0].neighbor
    }

    #[inline]
    pub(crate) fn line(&self, edge: EdgeId) -> Line {
        self.edges[edge.0].line
    }

    /// Move every face and edge of `other` into this arena
    ///
    /// The absorbed faces keep their relative order and are numbered after the existing
    /// ones. Returns the index of the first absorbed face.
    pub(crate) fn absorb(&mut self, other: FaceArena) -> FaceId {
        let face_offset = self.faces.len();
        let edge_offset = self.edges.len();
        let shift = |id: EdgeId| EdgeId(id.0 + edge_offset);

        self.faces.extend(other.faces.into_iter().map(|face| Face {
            site: face.site,
            first_edge: face.first_edge.map(shift),
        }));
        self.edges.extend(other.edges.into_iter().map(|edge| Edge {
            face: edge.face + face_offset,
            prev: shift(edge.prev),
            next: shift(edge.next),
            neighbor: edge.neighbor.map(shift),
            ..edge
        }));

        face_offset
    }

    /// Renumber faces so the face at position `i` becomes face `order[i]`
    ///
    /// `order` must be a permutation of `0..face_count()`.
    pub(crate) fn relabel(&mut self, order: &[usize]) {
        let mut slots: Vec<Option<Face>> = (0..self.faces.len()).map(|_| None).collect();
        for (position, face) in self.faces.drain(..).enumerate() {
            slots[order[position]] = Some(face);
        }
        self.faces = slots.into_iter().flatten().collect();

        for edge in &mut self.edges {
            edge.face = order[edge.face];
        }
    }

    /// Edges currently linked into `face`, starting at its first edge
    pub(crate) fn boundary(&self, face: FaceId) -> BoundaryWalk<'_> {
        BoundaryWalk {
            arena: self,
            first: self.faces[face].first_edge,
            current: self.faces[face].first_edge,
            remaining: self.edges.len(),
        }
    }

    /// Locate the arc of `face` that `line` passes through
    ///
    /// Both sides are `None` when the line misses the face: the last entry comes after the
    /// first exit, or the line runs parallel to an edge on its outer side.
    pub(crate) fn find_intersect_range(&self, face: FaceId, line: &Line) -> EdgeRange {
        let scale = 1.0_f64.max(line.anchor().length());
        let outside_parallel = self.boundary(face).any(|id| {
            let edge_line = self.edges[id.0].line;
            cross(edge_line.direction(), line.direction()).abs() < PARALLEL_EPSILON
                && edge_line.side(line.anchor()) < -PARALLEL_EPSILON * scale
        });
        if outside_parallel {
            return EdgeRange::default();
        }

        let range = self.clip(face, line, None);
        if let (Some(start), Some(end)) = (range.start, range.end) {
            let tolerance = MISS_TOLERANCE
                * 1.0_f64.max(start.distance.abs()).max(end.distance.abs());
            if start.distance > end.distance + tolerance {
                return EdgeRange::default();
            }
        }
        range
    }

    /// Clip `line` against the half-plane of every edge of `face`, ignoring `skip`
    ///
    /// An edge whose direction turns left onto the line (`cross(edge, line) > 0`) is where
    /// the line enters the region; the last such crossing bounds the range from the start.
    /// The first crossing of an edge turning right bounds it from the end.
    pub(crate) fn clip(&self, face: FaceId, line: &Line, skip: Option<EdgeId>) -> EdgeRange {
        let mut range = EdgeRange::default();

        for id in self.boundary(face) {
            if Some(id) == skip {
                continue;
            }
            let edge_line = self.edges[id.0].line;
            let turn = cross(edge_line.direction(), line.direction());
            if turn.abs() < PARALLEL_EPSILON {
                continue;
            }
            let Some(distance) = edge_line.intersection_distance_with(line) else {
                continue;
            };
            let crossing = Crossing { edge: id, distance };

            if turn > 0.0 {
                if range.start.map_or(true, |start| distance > start.distance) {
                    range.start = Some(crossing);
                }
            } else if range.end.map_or(true, |end| distance < end.distance) {
                range.end = Some(crossing);
            }
        }

        range
    }

    /// Insert a boundary edge on `line` into `face`, facing `neighbor_face`
    ///
    /// The new edge becomes the face's first edge. Edges on the arc the new edge cuts off
    /// are unlinked from the face. Unless `mirror` names an existing edge, the reversed line
    /// is inserted into `neighbor_face` as well and the two edges are wired as neighbors.
    pub(crate) fn insert_edge(
        &mut self,
        face: FaceId,
        line: Line,
        neighbor_face: FaceId,
        splice: Splice,
        mirror: Mirror,
    ) -> EdgeId {
        let (before, after) = match splice {
            Splice::Locate => {
                let range = self.find_intersect_range(face, &line);
                (
                    range.start.map(|crossing| crossing.edge),
                    range.end.map(|crossing| crossing.edge),
                )
            }
            Splice::Between { before, after } => (before, after),
        };

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            line,
            face,
            prev: id,
            next: id,
            neighbor: None,
            prev_intersects: false,
            next_intersects: false,
        });
        self.link(face, id, before, after);
        self.faces[face].first_edge = Some(id);

        let neighbor = match mirror {
            Mirror::Existing(edge) => edge,
            Mirror::Insert(neighbor_splice) => self.insert_edge(
                neighbor_face,
                line.reversed(),
                face,
                neighbor_splice,
                Mirror::Existing(id),
            ),
        };
        self.edges[id.0].neighbor = Some(neighbor);

        id
    }

    fn link(&mut self, face: FaceId, id: EdgeId, before: Option<EdgeId>, after: Option<EdgeId>) {
        let Some(first) = self.faces[face].first_edge else {
            // Lone edge: a full line with a gap on both ends.
            self.open(id, id);
            return;
        };

        match (before, after) {
            (Some(before), Some(after)) => {
                self.join(before, id);
                self.join(id, after);
            }
            (Some(before), None) => {
                let start = self.chain_start(before);
                self.join(before, id);
                self.open(id, start);
            }
            (None, Some(after)) => {
                let end = self.chain_end(after);
                self.open(end, id);
                self.join(id, after);
            }
            (None, None) => {
                let end = self.chain_end(first);
                let start = self.edges[end.0].next;
                self.open(end, id);
                self.open(id, start);
            }
        }
    }

    /// Link `from -> to` through a real boundary vertex
    fn join(&mut self, from: EdgeId, to: EdgeId) {
        self.edges[from.0].next = to;
        self.edges[from.0].next_intersects = true;
        self.edges[to.0].prev = from;
        self.edges[to.0].prev_intersects = true;
    }

    /// Link `from -> to` across a gap
    fn open(&mut self, from: EdgeId, to: EdgeId) {
        self.edges[from.0].next = to;
        self.edges[from.0].next_intersects = false;
        self.edges[to.0].prev = from;
        self.edges[to.0].prev_intersects = false;
    }

    /// First edge of the open chain containing `edge` (or `edge` on a closed loop)
    fn chain_start(&self, edge: EdgeId) -> EdgeId {
        let mut current = edge;
        for _ in 0..self.edges.len() {
            if !self.edges[current.0].prev_intersects {
                return current;
            }
            current = self.edges[current.0].prev;
            if current == edge {
                break;
            }
        }
        edge
    }

    /// Last edge of the open chain containing `edge` (or `edge` on a closed loop)
    fn chain_end(&self, edge: EdgeId) -> EdgeId {
        let mut current = edge;
        for _ in 0..self.edges.len() {
            if !self.edges[current.0].next_intersects {
                return current;
            }
            current = self.edges[current.0].next;
            if current == edge {
                break;
            }
        }
        edge
    }
}

/// Iterator over the edge ids linked into one face
pub(crate) struct BoundaryWalk<'a> {
    arena: &'a FaceArena,
    first: Option<EdgeId>,
    current: Option<EdgeId>,
    remaining: usize,
}

impl Iterator for BoundaryWalk<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let current = self.current?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let next = self.arena.edges[current.0].next;
        self.current = if Some(next) == self.first { None } else { Some(next) };
        Some(current)
    }
}

/// Read-only view of one face
#[derive(Clone, Copy)]
pub struct FaceHandle<'a> {
    arena: &'a FaceArena,
    face: FaceId,
}

impl<'a> FaceHandle<'a> {
    pub(crate) fn new(arena: &'a FaceArena, face: FaceId) -> Self {
        Self { arena, face }
    }

    /// Index of this face (and of its site)
    #[inline]
    pub fn index(&self) -> FaceId {
        self.face
    }

    /// The generating site
    #[inline]
    pub fn site(&self) -> DVec2 {
        self.arena.site(self.face)
    }

    /// Cursor on the most recently inserted edge; invalid for an edgeless face
    pub fn first_edge(&self) -> EdgeCursor<'a> {
        EdgeCursor {
            arena: self.arena,
            edge: self.arena.first_edge(self.face),
        }
    }

    /// All boundary edges in clockwise order, starting at [`first_edge`](Self::first_edge)
    pub fn edges(&self) -> impl Iterator<Item = EdgeCursor<'a>> + 'a {
        let arena = self.arena;
        arena.boundary(self.face).map(move |edge| EdgeCursor {
            arena,
            edge: Some(edge),
        })
    }

    pub fn edge_count(&self) -> usize {
        self.arena.boundary(self.face).count()
    }

    /// True when the face covers the whole plane
    pub fn is_empty(&self) -> bool {
        self.arena.first_edge(self.face).is_none()
    }

    /// True when the boundary is a closed loop with no gap
    pub fn is_bounded(&self) -> bool {
        !self.is_empty() && self.edges().all(|edge| edge.next_intersects())
    }

    /// Indices of the faces across each edge, in boundary order
    pub fn neighbors(&self) -> Vec<FaceId> {
        self.edges().filter_map(|edge| edge.neighbor_face()).collect()
    }

    /// Finite corners of the region in clockwise order
    ///
    /// For an open face the list runs from the corner after the incoming ray to the corner
    /// before the outgoing ray.
    pub fn vertices(&self) -> Vec<DVec2> {
        let start = self
            .edges()
            .find(|edge| !edge.prev_intersects())
            .or_else(|| self.edges().next());
        let Some(start) = start else {
            return Vec::new();
        };

        let mut vertices = Vec::new();
        let mut edge = start;
        for _ in 0..self.edge_count() {
            if let Some(corner) = edge.end_point() {
                vertices.push(corner);
            }
            edge = edge.next_edge();
            if edge == start {
                break;
            }
        }
        vertices
    }

    /// The edges where `line` enters and leaves this face
    ///
    /// The start edge is where the line passes into the face: `cross(edge, line) > 0`, which
    /// with y pointing down looks like a clockwise turn from the edge direction on screen.
    /// The end edge is where it passes out. Either cursor is invalid when the region is unbounded along the line in that
    /// direction. Both are invalid when the face has no edges or the line misses it.
    pub fn find_intersect_range(&self, line: &Line) -> (EdgeCursor<'a>, EdgeCursor<'a>) {
        let range = self.arena.find_intersect_range(self.face, line);
        (
            EdgeCursor {
                arena: self.arena,
                edge: range.start.map(|crossing| crossing.edge),
            },
            EdgeCursor {
                arena: self.arena,
                edge: range.end.map(|crossing| crossing.edge),
            },
        )
    }
}

impl std::fmt::Debug for FaceHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceHandle")
            .field("index", &self.face)
            .field("site", &self.site())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Read-only cursor on a boundary edge, possibly invalid
///
/// Every accessor on an invalid cursor returns a neutral value (`None`, `false`, or another
/// invalid cursor), so callers must check [`is_valid`](Self::is_valid) before relying on
/// the result.
#[derive(Clone, Copy)]
pub struct EdgeCursor<'a> {
    arena: &'a FaceArena,
    edge: Option<EdgeId>,
}

impl<'a> EdgeCursor<'a> {
    fn edge(&self) -> Option<&'a Edge> {
        let arena = self.arena;
        self.edge.map(|id| &arena.edges[id.0])
    }

    fn at(&self, edge: Option<EdgeId>) -> Self {
        Self {
            arena: self.arena,
            edge,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.edge.is_some()
    }

    #[inline]
    pub fn id(&self) -> Option<EdgeId> {
        self.edge
    }

    /// The bounding line, by value
    pub fn line(&self) -> Option<Line> {
        self.edge().map(|edge| edge.line)
    }

    /// Face this edge belongs to
    pub fn face(&self) -> Option<FaceId> {
        self.edge().map(|edge| edge.face)
    }

    pub fn next_edge(&self) -> Self {
        self.at(self.edge().map(|edge| edge.next))
    }

    pub fn prev_edge(&self) -> Self {
        self.at(self.edge().map(|edge| edge.prev))
    }

    /// Whether this is the face's first edge
    pub fn is_first(&self) -> bool {
        match self.edge() {
            Some(edge) => self.arena.first_edge(edge.face) == self.edge,
            None => false,
        }
    }

    /// Whether the next edge wraps around to the face's first edge
    pub fn is_last(&self) -> bool {
        match self.edge() {
            Some(edge) => self.arena.first_edge(edge.face) == Some(edge.next),
            None => false,
        }
    }

    /// False when the region is open between the previous edge and this one
    pub fn prev_intersects(&self) -> bool {
        self.edge().map_or(false, |edge| edge.prev_intersects)
    }

    /// False when the region is open between this edge and the next one
    pub fn next_intersects(&self) -> bool {
        self.edge().map_or(false, |edge| edge.next_intersects)
    }

    /// The mirror edge on the other side of the bisector
    pub fn neighbor_edge(&self) -> Self {
        self.at(self.edge().and_then(|edge| edge.neighbor))
    }

    /// The face on the other side of the bisector
    pub fn neighbor_face(&self) -> Option<FaceId> {
        self.neighbor_edge().face()
    }

    /// Corner shared with the previous edge, if the boundary is closed there
    pub fn start_point(&self) -> Option<DVec2> {
        let edge = self.edge()?;
        if !edge.prev_intersects {
            return None;
        }
        self.arena.edges[edge.prev.0].line.intersection_with(&edge.line)
    }

    /// Corner shared with the next edge, if the boundary is closed there
    pub fn end_point(&self) -> Option<DVec2> {
        let edge = self.edge()?;
        if !edge.next_intersects {
            return None;
        }
        self.arena.edges[edge.next.0].line.intersection_with(&edge.line)
    }
}

impl PartialEq for EdgeCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.edge == other.edge
    }
}

impl std::fmt::Debug for EdgeCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.edge {
            Some(id) => write!(f, "EdgeCursor({})", id.0),
            None => write!(f, "EdgeCursor(invalid)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Face 0 at the origin surrounded by four sites two units away
    fn square_arena() -> FaceArena {
        let sites = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(-2.0, 0.0),
            DVec2::new(0.0, -2.0),
        ];
        let mut arena = FaceArena::with_sites(&sites);
        for neighbor in 1..sites.len() {
            arena.insert_edge(
                0,
                Line::perpendicular_bisector(sites[0], sites[neighbor]),
                neighbor,
                Splice::Locate,
                Mirror::Insert(Splice::Locate),
            );
        }
        arena
    }

    fn pair_arena() -> (FaceArena, EdgeId) {
        let sites = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let mut arena = FaceArena::with_sites(&sites);
        let edge = arena.insert_edge(
            0,
            Line::perpendicular_bisector(sites[0], sites[1]),
            1,
            Splice::Locate,
            Mirror::Insert(Splice::Locate),
        );
        (arena, edge)
    }

    #[test]
    fn test_single_edge_is_self_linked() {
        let (arena, edge) = pair_arena();
        let face = FaceHandle::new(&arena, 0);

        assert_eq!(face.edge_count(), 1);
        let cursor = face.first_edge();
        assert_eq!(cursor.id(), Some(edge));
        assert_eq!(cursor.next_edge(), cursor);
        assert_eq!(cursor.prev_edge(), cursor);
        assert!(!cursor.prev_intersects());
        assert!(!cursor.next_intersects());
        assert!(cursor.is_first());
        assert!(cursor.is_last());
        assert!(!face.is_bounded());
    }

    #[test]
    fn test_reciprocal_insertion_wires_neighbors() {
        let (arena, edge) = pair_arena();

        let mirror = arena.neighbor(edge).unwrap();
        assert_eq!(arena.face_of(mirror), 1);
        assert_eq!(arena.neighbor(mirror), Some(edge));
        assert_eq!(arena.line(mirror), arena.line(edge).reversed());

        let cursor = FaceHandle::new(&arena, 0).first_edge();
        assert_eq!(cursor.neighbor_face(), Some(1));
        assert_eq!(cursor.neighbor_edge().neighbor_edge(), cursor);
    }

    #[test]
    fn test_closed_square_face() {
        let arena = square_arena();
        let face = FaceHandle::new(&arena, 0);

        assert_eq!(face.edge_count(), 4);
        assert!(face.is_bounded());

        let vertices = face.vertices();
        assert_eq!(vertices.len(), 4);
        for corner in &vertices {
            assert!((corner.x.abs() - 1.0).abs() < 1e-9);
            assert!((corner.y.abs() - 1.0).abs() < 1e-9);
        }

        // Clockwise in screen space: positive shoelace sum.
        let area: f64 = (0..4)
            .map(|i| cross(vertices[i], vertices[(i + 1) % 4]))
            .sum::<f64>()
            * 0.5;
        assert!((area - 4.0).abs() < 1e-9);

        let mut neighbors = face.neighbors();
        neighbors.sort();
        assert_eq!(neighbors, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_open_face_keeps_one_gap() {
        let sites = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
        ];
        let mut arena = FaceArena::with_sites(&sites);
        for neighbor in 1..3 {
            arena.insert_edge(
                0,
                Line::perpendicular_bisector(sites[0], sites[neighbor]),
                neighbor,
                Splice::Locate,
                Mirror::Insert(Splice::Locate),
            );
        }

        let face = FaceHandle::new(&arena, 0);
        assert_eq!(face.edge_count(), 2);
        assert!(!face.is_bounded());

        let gaps_before = face.edges().filter(|e| !e.prev_intersects()).count();
        let gaps_after = face.edges().filter(|e| !e.next_intersects()).count();
        assert_eq!(gaps_before, 1);
        assert_eq!(gaps_after, 1);

        let vertices = face.vertices();
        assert_eq!(vertices.len(), 1);
        assert!((vertices[0] - DVec2::new(1.0, 1.0)).length() < 1e-9);
    }

    #[test]
    fn test_cutting_line_unlinks_enclosed_edges() {
        let mut arena = square_arena();
        let corner_neighbor = arena.faces.len();
        arena.faces.push(Face {
            site: DVec2::new(1.5, 1.5),
            first_edge: None,
        });

        // Bisector with a site beyond the (1, 1) corner clips that corner off.
        let corner_cut = Line::perpendicular_bisector(DVec2::ZERO, DVec2::new(1.5, 1.5));
        arena.insert_edge(
            0,
            corner_cut,
            corner_neighbor,
            Splice::Locate,
            Mirror::Insert(Splice::Locate),
        );
        assert_eq!(FaceHandle::new(&arena, 0).edge_count(), 5);

        // A close site on the right removes the x = 1 edge and the corner cut completely.
        let close_neighbor = arena.faces.len();
        arena.faces.push(Face {
            site: DVec2::new(0.5, 0.0),
            first_edge: None,
        });
        let close_cut = Line::perpendicular_bisector(DVec2::ZERO, DVec2::new(0.5, 0.0));
        arena.insert_edge(
            0,
            close_cut,
            close_neighbor,
            Splice::Locate,
            Mirror::Insert(Splice::Locate),
        );
        let face = FaceHandle::new(&arena, 0);
        assert_eq!(face.edge_count(), 4);
        assert!(face.is_bounded());
        for edge in face.edges() {
            assert!(edge.line().unwrap().to_the_left(DVec2::ZERO));
        }
        let mut neighbors = face.neighbors();
        neighbors.sort();
        assert_eq!(neighbors, vec![2, 3, 4, close_neighbor]);
    }

    #[test]
    fn test_explicit_splice_shifts_gap() {
        let (mut arena, first) = pair_arena();
        arena.faces.push(Face {
            site: DVec2::new(0.0, 10.0),
            first_edge: None,
        });

        // Explicit "before" only: the new edge follows `first`, the gap moves after it.
        let line = Line::perpendicular_bisector(DVec2::ZERO, DVec2::new(0.0, 10.0));
        let added = arena.insert_edge(
            0,
            line,
            2,
            Splice::Between {
                before: Some(first),
                after: None,
            },
            Mirror::Insert(Splice::Locate),
        );

        let face = FaceHandle::new(&arena, 0);
        let cursor = face.first_edge();
        assert_eq!(cursor.id(), Some(added));
        assert!(cursor.prev_intersects());
        assert!(!cursor.next_intersects());
        assert_eq!(cursor.prev_edge().id(), Some(first));
        assert!(!cursor.prev_edge().prev_intersects());
        assert_eq!(cursor.end_point(), None);
        assert!((cursor.start_point().unwrap() - DVec2::new(5.0, 5.0)).length() < 1e-9);
    }

    #[test]
    fn test_find_intersect_range() {
        let arena = square_arena();
        let face = FaceHandle::new(&arena, 0);

        // Heading right through the square: enters on the left side, leaves on the right.
        let line = Line::new(DVec2::new(-5.0, 0.25), DVec2::X);
        let (start, end) = face.find_intersect_range(&line);
        assert_eq!(start.neighbor_face(), Some(3));
        assert_eq!(end.neighbor_face(), Some(1));

        let range = arena.find_intersect_range(0, &line);
        assert!((range.start.unwrap().distance - 4.0).abs() < 1e-9);
        assert!((range.end.unwrap().distance - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_intersect_range_misses_face() {
        let arena = square_arena();
        let face = FaceHandle::new(&arena, 0);

        // Passes below and to the right of the square without touching it.
        let diagonal = Line::new(DVec2::new(3.0, 0.0), DVec2::new(1.0, 1.0));
        let (start, end) = face.find_intersect_range(&diagonal);
        assert!(!start.is_valid());
        assert!(!end.is_valid());

        let shallow = Line::new(DVec2::new(-50.0, 40.0), DVec2::new(1.0, 0.3));
        let range = arena.find_intersect_range(0, &shallow);
        assert!(range.start.is_none());
        assert!(range.end.is_none());

        // Parallel to the top and bottom edges, but outside the bottom one.
        let outside = Line::new(DVec2::new(-5.0, 3.0), DVec2::X);
        let (start, end) = face.find_intersect_range(&outside);
        assert!(!start.is_valid());
        assert!(!end.is_valid());

        // Parallel and between them: still a real crossing.
        let inside = Line::new(DVec2::new(-5.0, -0.5), DVec2::X);
        let (start, end) = face.find_intersect_range(&inside);
        assert_eq!(start.neighbor_face(), Some(3));
        assert_eq!(end.neighbor_face(), Some(1));
    }

    #[test]
    fn test_find_intersect_range_on_empty_face() {
        let arena = FaceArena::with_sites(&[DVec2::ZERO]);
        let face = FaceHandle::new(&arena, 0);
        let (start, end) = face.find_intersect_range(&Line::new(DVec2::ZERO, DVec2::X));

        assert!(!start.is_valid());
        assert!(!end.is_valid());
        assert!(face.is_empty());
        assert!(face.vertices().is_empty());
        assert_eq!(start.line(), None);
        assert!(!start.next_edge().is_valid());
    }

    #[test]
    fn test_absorb_offsets_indices() {
        let (left, _) = pair_arena();
        let (right, _) = pair_arena();
        let mut merged = left;
        let offset = merged.absorb(right);

        assert_eq!(offset, 2);
        assert_eq!(merged.face_count(), 4);
        let edge = merged.first_edge(2).unwrap();
        assert_eq!(merged.face_of(edge), 2);
        let mirror = merged.neighbor(edge).unwrap();
        assert_eq!(merged.face_of(mirror), 3);
        assert_eq!(merged.neighbor(mirror), Some(edge));
    }

    #[test]
    fn test_relabel_moves_faces_and_edges() {
        let (mut arena, edge) = pair_arena();
        arena.relabel(&[1, 0]);

        assert_eq!(arena.site(1), DVec2::new(0.0, 0.0));
        assert_eq!(arena.site(0), DVec2::new(10.0, 0.0));
        assert_eq!(arena.face_of(edge), 1);
        assert_eq!(arena.first_edge(1), Some(edge));
    }
}
