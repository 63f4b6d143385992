//! Diagram Configuration and Builder
//!
//! This module provides the options that control how a [`VoronoiDiagram`](crate::VoronoiDiagram)
//! is generated from user-supplied sites.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Below this many sites a merge is always run on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// What to do with sites that share an x or y coordinate
///
/// The divide-and-conquer merge needs pairwise distinct x and y coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`VoronoiError::DegenerateInput`] (default)
    #[default]
    Reject,
    /// Nudge colliding sites by a random offset until every coordinate is unique
    ///
    /// The offset is drawn from `[0, max_offset)` on both axes, repeatedly if needed. The
    /// random stream is seeded from [`DiagramConfig::seed`].
    Jitter {
        /// Largest offset added per nudge
        max_offset: f64,
    },
    /// Skip all checks; the caller guarantees the input is valid
    Unchecked,
}

/// Configuration for generating a Voronoi diagram
///
/// # Example
///
/// ```rust
/// use rust_voronoi_planar::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .duplicates(DuplicatePolicy::Jitter { max_offset: 1.0 })
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// The sites are already sorted by ascending x; skip the sort
    pub presorted: bool,

    /// Handling of sites with a shared x or y coordinate
    pub duplicates: DuplicatePolicy,

    /// Seed for every random choice made during generation (duplicate jitter)
    pub seed: u32,

    /// Minimum sub-problem size for building both halves concurrently
    ///
    /// Only used with the `parallel` feature.
    pub parallel_threshold: usize,

    /// Print timing diagnostics to stderr
    pub verbose: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfig {
            presorted: false,
            duplicates: DuplicatePolicy::default(),
            seed: rand::random(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            verbose: false,
        }
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_planar::*;
///
/// // Use defaults
/// let config = DiagramConfigBuilder::new().build().unwrap();
/// assert_eq!(config.duplicates, DuplicatePolicy::Reject);
///
/// // Customize
/// let config = DiagramConfigBuilder::new()
///     .seed(12345)
///     .presorted(true)
///     .parallel_threshold(4096)
///     .unwrap()
///     .verbose(true)
///     .build()
///     .unwrap();
/// assert!(config.presorted);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u32>,
    presorted: bool,
    duplicates: DuplicatePolicy,
    parallel_threshold: usize,
    verbose: bool,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - presorted: false
    /// - duplicates: Reject
    /// - parallel_threshold: 1024 sites
    /// - verbose: false
    pub fn new() -> Self {
        Self {
            seed: None,
            presorted: false,
            duplicates: DuplicatePolicy::Reject,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            verbose: false,
        }
    }

    /// Set the random seed
    ///
    /// Using the same seed with the same sites produces an identical diagram.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Declare the input as already sorted by ascending x
    pub fn presorted(mut self, presorted: bool) -> Self {
        self.presorted = presorted;
        self
    }

    /// Set the duplicate-coordinate policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a jitter offset is not a positive finite number
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Result<Self> {
        if let DuplicatePolicy::Jitter { max_offset } = policy {
            if !max_offset.is_finite() || max_offset <= 0.0 {
                return Err(VoronoiError::InvalidConfig(format!(
                    "Jitter offset must be positive and finite (got {})",
                    max_offset
                )));
            }
        }
        self.duplicates = policy;
        Ok(self)
    }

    /// Set the minimum sub-problem size for concurrent construction
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold < 3 (smaller problems have no merge step)
    pub fn parallel_threshold(mut self, threshold: usize) -> Result<Self> {
        if threshold < 3 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Parallel threshold must be >= 3 (got {})",
                threshold
            )));
        }
        self.parallel_threshold = threshold;
        Ok(self)
    }

    /// Enable timing diagnostics on stderr
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<DiagramConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(DiagramConfig {
            presorted: self.presorted,
            duplicates: self.duplicates,
            seed,
            parallel_threshold: self.parallel_threshold,
            verbose: self.verbose,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
