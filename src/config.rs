//! Maze Configuration and Builder
//!
//! This module provides configuration types for deterministic maze generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::generation::polygon::BoundingBox;
use crate::generation::LloydOptions;
use crate::rng::MazeRng;

/// Default number of cells
const DEFAULT_CELL_COUNT: usize = 300;
/// Default side length of the square domain
const DEFAULT_DOMAIN_SIZE: f64 = 800.0;
/// Default number of Lloyd iterations
const DEFAULT_RELAXATION: usize = 2;

/// Configuration for deterministic maze generation
///
/// The same configuration with a non-empty seed always produces the identical
/// maze: same sites, same passages, same start and end cells.
///
/// # Example
///
/// ```rust
/// use voronoi_maze::*;
///
/// let config = MazeConfigBuilder::new()
///     .seed("abc")
///     .cell_count(50)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MazeConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    /// Seed string for the random stream
    ///
    /// `None` or an empty string produces a different maze every time.
    pub seed: Option<String>,

    /// Number of sites to scatter (at least 2)
    pub cell_count: usize,

    /// Side length of the square domain `[0, domain_size)²`
    pub domain_size: f64,

    /// Number of Lloyd relaxation iterations
    ///
    /// - 0: Raw random Voronoi cells (irregular)
    /// - 1-3: Noticeably more even cell sizes
    /// - 10+: Diminishing returns
    pub relaxation_iterations: usize,

    /// Early-exit threshold for relaxation, as a fraction of `domain_size`
    ///
    /// 0.0 (the default) runs every iteration.
    pub relaxation_convergence: f64,
}

impl MazeConfig {
    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the cell count is below 2, the domain size
    /// is not a positive finite number, or the convergence threshold is
    /// negative or NaN.
    pub fn validate(&self) -> Result<()> {
        validate_cell_count(self.cell_count)?;
        validate_domain_size(self.domain_size)?;
        validate_convergence(self.relaxation_convergence)?;
        Ok(())
    }

    /// Build the random stream described by the seed
    pub fn rng(&self) -> MazeRng {
        MazeRng::from_optional_seed(self.seed.as_deref())
    }

    /// Bounding box of the domain
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::square(self.domain_size)
    }

    /// Relaxation options derived from this configuration
    #[inline]
    pub fn lloyd_options(&self) -> LloydOptions {
        LloydOptions {
            max_iterations: self.relaxation_iterations,
            convergence_threshold: self.relaxation_convergence,
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cell_count: DEFAULT_CELL_COUNT,
            domain_size: DEFAULT_DOMAIN_SIZE,
            relaxation_iterations: DEFAULT_RELAXATION,
            relaxation_convergence: 0.0,
        }
    }
}

fn validate_cell_count(cell_count: usize) -> Result<()> {
    if cell_count < 2 {
        return Err(MazeError::InvalidParameter(format!(
            "cell count must be at least 2 (got {})",
            cell_count
        )));
    }
    Ok(())
}

fn validate_domain_size(domain_size: f64) -> Result<()> {
    if !domain_size.is_finite() || domain_size <= 0.0 {
        return Err(MazeError::InvalidParameter(format!(
            "domain size must be a positive number (got {})",
            domain_size
        )));
    }
    Ok(())
}

fn validate_convergence(threshold: f64) -> Result<()> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(MazeError::InvalidParameter(format!(
            "relaxation convergence threshold must be >= 0 (got {})",
            threshold
        )));
    }
    Ok(())
}

/// Builder for creating MazeConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_maze::*;
///
/// // Use defaults
/// let config = MazeConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = MazeConfigBuilder::new()
///     .seed("labyrinth")
///     .cell_count(120)
///     .unwrap()
///     .domain_size(400.0)
///     .unwrap()
///     .relaxation_iterations(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MazeConfigBuilder {
    seed: Option<String>,
    cell_count: usize,
    domain_size: f64,
    relaxation_iterations: usize,
    relaxation_convergence: f64,
}

impl MazeConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: None (non-reproducible)
    /// - cell_count: 300
    /// - domain_size: 800.0
    /// - relaxation_iterations: 2
    /// - relaxation_convergence: 0.0 (run every iteration)
    pub fn new() -> Self {
        let defaults = MazeConfig::default();
        Self {
            seed: defaults.seed,
            cell_count: defaults.cell_count,
            domain_size: defaults.domain_size,
            relaxation_iterations: defaults.relaxation_iterations,
            relaxation_convergence: defaults.relaxation_convergence,
        }
    }

    /// Set the seed string
    ///
    /// Using the same seed with the same other parameters will produce
    /// an identical maze every time.
    pub fn seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Set the number of cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `cell_count` is below 2
    pub fn cell_count(mut self, cell_count: usize) -> Result<Self> {
        validate_cell_count(cell_count)?;
        self.cell_count = cell_count;
        Ok(self)
    }

    /// Set the side length of the square domain
    ///
    /// Neighboring cells are matched on vertices rounded to 3 decimal places.
    /// Domains so small that cell corners lie within 0.001 of each other
    /// lose shared edges and yield a disconnected maze; keep cells at least a
    /// few units wide.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `size` is not a positive finite number
    pub fn domain_size(mut self, size: f64) -> Result<Self> {
        validate_domain_size(size)?;
        self.domain_size = size;
        Ok(self)
    }

    /// Set the number of Lloyd relaxation iterations
    pub fn relaxation_iterations(mut self, iterations: usize) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    /// Set the early-exit threshold for relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if threshold is negative or NaN
    pub fn relaxation_convergence(mut self, threshold: f64) -> Result<Self> {
        validate_convergence(threshold)?;
        self.relaxation_convergence = threshold;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<MazeConfig> {
        let config = MazeConfig {
            seed: self.seed,
            cell_count: self.cell_count,
            domain_size: self.domain_size,
            relaxation_iterations: self.relaxation_iterations,
            relaxation_convergence: self.relaxation_convergence,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for MazeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
