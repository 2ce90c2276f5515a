//! Tessellation pipeline
//!
//! Scatters random sites over a square domain, evens them out with Lloyd's
//! relaxation and turns the final Voronoi diagram into cells linked by their
//! shared edges.

mod delaunay;
mod lloyd;
mod points;
pub mod polygon;
mod voronoi;

pub use delaunay::{Diagram, GeometryProvider, SpadeDiagram, SpadeProvider};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::generate_sites;
pub use voronoi::{build_cells, build_neighbor_graph, shared_edge, EDGE_PRECISION};

use glam::DVec2;
use tracing::debug;

use crate::cell::Cell;
use crate::config::MazeConfig;
use crate::error::{MazeError, Result};
use crate::rng::MazeRng;
use polygon::BoundingBox;

/// Relaxed sites and the cell graph built from them
#[derive(Debug, Clone)]
pub struct Tessellation {
    /// Side length of the square domain
    pub domain_size: f64,
    /// Final (relaxed) sites, one per requested cell
    pub sites: Vec<DVec2>,
    /// Cells in ascending ID order; sites without a polygon are missing
    pub cells: Vec<Cell>,
}

impl Tessellation {
    /// Number of sites that were dropped for lack of a polygon
    #[inline]
    pub fn dropped_count(&self) -> usize {
        self.sites.len() - self.cells.len()
    }
}

/// Build a tessellation from explicit parameters
///
/// # Arguments
///
/// * `cell_count` - Number of sites to scatter (at least 1)
/// * `domain_size` - Side length of the square domain (positive)
/// * `options` - Lloyd relaxation options
/// * `provider` - Source of Voronoi diagrams
/// * `rng` - Random stream; consumes two draws per site
///
/// # Errors
///
/// Returns `InvalidParameter` before touching the provider if `cell_count`
/// is 0 or `domain_size` is not a positive finite number, and propagates
/// provider failures.
pub fn build_tessellation<P: GeometryProvider>(
    cell_count: usize,
    domain_size: f64,
    options: LloydOptions,
    provider: &P,
    rng: &mut MazeRng,
) -> Result<Tessellation> {
    if cell_count == 0 {
        return Err(MazeError::InvalidParameter(
            "cell count must be at least 1".to_string(),
        ));
    }
    if !domain_size.is_finite() || domain_size <= 0.0 {
        return Err(MazeError::InvalidParameter(format!(
            "domain size must be a positive number (got {})",
            domain_size
        )));
    }

    let bounds = BoundingBox::square(domain_size);

    // Step 1: Scatter random sites
    let sites = generate_sites(cell_count, domain_size, rng);

    // Step 2: Relax towards centroids
    let sites = lloyd_relaxation_with_options(sites, &bounds, options, provider)?;

    // Step 3: Final diagram and cells
    let diagram = provider.triangulate(&sites)?;
    let mut cells = build_cells(&diagram, &sites, &bounds);

    // Step 4: Adjacency through shared edges
    build_neighbor_graph(&diagram, &mut cells);

    let tessellation = Tessellation {
        domain_size,
        sites,
        cells,
    };
    debug!(
        sites = tessellation.sites.len(),
        cells = tessellation.cells.len(),
        dropped = tessellation.dropped_count(),
        "tessellation built"
    );

    Ok(tessellation)
}

/// Build the tessellation described by a configuration
///
/// # Errors
///
/// Same as [`build_tessellation`].
pub fn generate_tessellation<P: GeometryProvider>(
    config: &MazeConfig,
    provider: &P,
    rng: &mut MazeRng,
) -> Result<Tessellation> {
    build_tessellation(
        config.cell_count,
        config.domain_size,
        config.lloyd_options(),
        provider,
        rng,
    )
}
