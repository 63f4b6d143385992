//! Planar Voronoi diagrams by divide and conquer
//!
//! A standalone library that partitions the plane into one region per input site, each
//! region holding the points closer to its site than to any other. The diagram is built by
//! recursively splitting the x-sorted sites in half and stitching the two half-diagrams
//! together along a bisector seam, in O(n log n).
//!
//! Every region keeps its boundary as a clockwise circular list of edges, each edge knowing
//! the neighboring region across it. Regions on the convex hull are unbounded; their edge
//! list has a single gap where the region runs off to infinity.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_planar::*;
//!
//! // Random sites in an 800 x 600 rectangle
//! let sites = generation::random_sites(500, 800.0, 600.0, 42);
//!
//! let config = DiagramConfigBuilder::new().seed(42).build().unwrap();
//! let diagram = VoronoiDiagram::generate(sites, &config).unwrap();
//!
//! for face in diagram.faces().take(3) {
//!     println!(
//!         "site {:?}: {} edges, neighbors {:?}",
//!         face.site(),
//!         face.edge_count(),
//!         face.neighbors()
//!     );
//! }
//! println!("hull: {:?}", diagram.hull());
//! ```
//!
//! # Coordinates
//!
//! Coordinates are screen-space: y grows downward. "Clockwise" and "left of" are meant on
//! screen, so a face's interior is on the left of each of its edges.
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) point-to-face lookups using a KD-tree
//! - `serde`: Enables serialization support for configuration, lines and cells
//! - `parallel`: Builds large sub-problems on both halves concurrently with rayon

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod face;
pub mod cell;
pub mod generation;
pub mod diagram;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{Axis, VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder, DuplicatePolicy};
pub use geometry::Line;
pub use face::{EdgeCursor, EdgeId, FaceHandle, FaceId};
pub use cell::VoronoiCell;
pub use diagram::VoronoiDiagram;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
