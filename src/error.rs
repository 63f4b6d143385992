//! Error types for diagram construction and queries

use std::fmt;

/// Coordinate axis on which two sites collide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors that can occur during diagram construction or queries
#[derive(Debug, Clone, PartialEq)]
pub enum VoronoiError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Two sites share a coordinate, which the divide-and-conquer merge cannot handle
    DegenerateInput {
        /// Index of the first offending site
        first: usize,
        /// Index of the second offending site
        second: usize,
        /// Axis on which they coincide
        axis: Axis,
    },
    /// A site has a NaN or infinite coordinate
    NonFiniteSite(usize),
    /// Construction failed due to geometry issues
    GenerationFailed(String),
    /// Requested face index does not exist
    FaceNotFound(usize),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            VoronoiError::DegenerateInput {
                first,
                second,
                axis,
            } => write!(
                f,
                "degenerate input: sites {} and {} share the same {} coordinate",
                first, second, axis
            ),
            VoronoiError::NonFiniteSite(index) => {
                write!(f, "site {} has a non-finite coordinate", index)
            }
            VoronoiError::GenerationFailed(msg) => write!(f, "generation failed: {}", msg),
            VoronoiError::FaceNotFound(id) => write!(f, "face not found: {}", id),
        }
    }
}

impl std::error::Error for VoronoiError {}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
