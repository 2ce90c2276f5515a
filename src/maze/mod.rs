//! Maze aggregate: carved passages, endpoints and solving
//!
//! A [`Maze`] is one complete generation. It is immutable once built, so a
//! renderer can hold on to it while a new one is being generated.
//! [`MazeState`] owns the current maze together with its current solution
//! and swaps both out atomically on regeneration.

mod carve;
mod endpoints;
mod solve;

pub use carve::{carve_passages, Passage, PassageSet};
pub use endpoints::select_endpoints;
pub use solve::{find_path, solution_polyline, solve, Solution};

use glam::DVec2;
use tracing::{info, warn};

use crate::cell::{Cell, SharedEdge};
use crate::config::MazeConfig;
use crate::error::{MazeError, Result};
use crate::generation::{generate_tessellation, GeometryProvider, SpadeProvider, Tessellation};
use crate::rng::MazeRng;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A perfect maze over a Voronoi tessellation
///
/// # Examples
///
/// ```
/// use voronoi_maze::*;
///
/// let config = MazeConfigBuilder::new()
///     .seed("abc")
///     .cell_count(60)
///     .unwrap()
///     .domain_size(300.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let maze = Maze::generate(&config).unwrap();
/// assert_eq!(maze.passages().len(), maze.cell_count() - 1);
///
/// let solution = maze.solve();
/// assert_eq!(solution.path().first(), Some(&maze.start_id()));
/// assert_eq!(solution.path().last(), Some(&maze.end_id()));
/// ```
#[derive(Debug, Clone)]
pub struct Maze {
    /// Side length of the square domain
    domain_size: f64,

    /// All relaxed sites, including those that produced no cell
    sites: Vec<DVec2>,

    /// Cells in ascending ID order
    cells: Vec<Cell>,

    /// Open walls
    passages: PassageSet,

    start: usize,
    end: usize,

    /// Nearest-site lookup over `cells` (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Maze {
    /// Generate a maze with the default spade-backed geometry
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is invalid or fewer
    /// than two cells survive tessellation, and `GenerationFailed` if the
    /// triangulation fails.
    pub fn generate(config: &MazeConfig) -> Result<Self> {
        Self::generate_with_provider(config, &SpadeProvider)
    }

    /// Generate a maze with a custom geometry provider
    ///
    /// # Errors
    ///
    /// Same as [`Maze::generate`].
    pub fn generate_with_provider<P: GeometryProvider>(
        config: &MazeConfig,
        provider: &P,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = config.rng();
        let tessellation = generate_tessellation(config, provider, &mut rng)?;

        if tessellation.cells.len() < 2 {
            return Err(MazeError::InvalidParameter(format!(
                "only {} of {} sites produced a cell; at least 2 are needed",
                tessellation.cells.len(),
                tessellation.sites.len()
            )));
        }

        let maze = Self::from_tessellation(tessellation, &mut rng)?;
        info!(
            cells = maze.cell_count(),
            passages = maze.passages.len(),
            start = maze.start,
            end = maze.end,
            deterministic = rng.is_deterministic(),
            "maze generated"
        );
        Ok(maze)
    }

    /// Carve a maze over an existing tessellation
    ///
    /// Works with any non-empty tessellation, including a single cell (whose
    /// start and end are the same cell).
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if the tessellation has no cells.
    pub fn from_tessellation(tessellation: Tessellation, rng: &mut MazeRng) -> Result<Self> {
        let Tessellation {
            domain_size,
            sites,
            cells,
        } = tessellation;

        let passages = carve_passages(&cells, rng);
        if passages.len() + 1 < cells.len() {
            warn!(
                cells = cells.len(),
                passages = passages.len(),
                components = cells.len() - passages.len(),
                "cell graph is disconnected; some cells are unreachable"
            );
        }

        let (start, end) = select_endpoints(&cells).ok_or_else(|| {
            MazeError::GenerationFailed("tessellation contains no cells".to_string())
        })?;

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let cell_sites: Vec<DVec2> = cells.iter().map(|c| c.site).collect();
            SpatialIndex::new(&cell_sites)
        };

        Ok(Self {
            domain_size,
            sites,
            cells,
            passages,
            start,
            end,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Side length of the square domain
    #[inline]
    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// All relaxed sites, indexed by cell ID
    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    /// Number of cells in the maze
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in ascending ID order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by ID
    ///
    /// Returns `None` for IDs of dropped sites and out-of-range IDs.
    pub fn get_cell(&self, id: usize) -> Option<&Cell> {
        self.cells
            .binary_search_by_key(&id, |cell| cell.id)
            .ok()
            .map(|index| &self.cells[index])
    }

    /// Open passages
    #[inline]
    pub fn passages(&self) -> &PassageSet {
        &self.passages
    }

    /// Number of separate regions of the maze
    ///
    /// 1 for a perfect maze. Larger values mean the cell graph itself was
    /// disconnected, for example because vertex matching merged the corners
    /// of cells in a very small domain.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.cells.len() - self.passages.len()
    }

    /// Each open passage with the wall segment it opens
    pub fn passage_edges(&self) -> impl Iterator<Item = (Passage, SharedEdge)> + '_ {
        self.passages.iter().filter_map(|&passage| {
            let (a, b) = passage.cells();
            let edge = *self.get_cell(a)?.shared_edge_with(b)?;
            Some((passage, edge))
        })
    }

    /// ID of the start cell
    #[inline]
    pub fn start_id(&self) -> usize {
        self.start
    }

    /// ID of the end cell
    #[inline]
    pub fn end_id(&self) -> usize {
        self.end
    }

    /// The start cell
    pub fn start_cell(&self) -> &Cell {
        self.cell_or_first(self.start)
    }

    /// The end cell
    pub fn end_cell(&self) -> &Cell {
        self.cell_or_first(self.end)
    }

    // start/end always name an existing cell and `cells` is never empty
    fn cell_or_first(&self, id: usize) -> &Cell {
        self.get_cell(id).unwrap_or(&self.cells[0])
    }

    /// Solve from the start cell to the end cell
    ///
    /// An empty [`Solution`] means the end is unreachable, which only happens
    /// when the underlying cell graph is disconnected.
    pub fn solve(&self) -> Solution {
        solve(&self.cells, &self.passages, self.start, self.end)
    }

    /// Solve between two arbitrary cells
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` if either ID has no cell.
    pub fn solve_between(&self, from: usize, to: usize) -> Result<Solution> {
        for id in [from, to] {
            if self.get_cell(id).is_none() {
                return Err(MazeError::CellNotFound(id));
            }
        }
        Ok(solve(&self.cells, &self.passages, from, to))
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// The cell whose site is nearest to `position` is the Voronoi cell
    /// containing it.
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_maze::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let config = MazeConfigBuilder::new().seed("x").cell_count(20).unwrap().build().unwrap();
    /// # let maze = Maze::generate(&config).unwrap();
    /// let site = maze.start_cell().site;
    /// assert_eq!(maze.find_cell_at(site), maze.start_id());
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec2) -> usize {
        self.cells[self.spatial_index.find_nearest(position)].id
    }
}

/// The current maze plus its current solution
///
/// Regeneration builds the new maze completely before replacing the old one,
/// so a failed regeneration leaves the previous maze and solution intact, and
/// a successful one always discards the stale solution.
#[derive(Debug, Clone)]
pub struct MazeState {
    maze: Maze,
    solution: Option<Solution>,
}

impl MazeState {
    /// Generate the initial maze
    ///
    /// # Errors
    ///
    /// Same as [`Maze::generate`].
    pub fn new(config: &MazeConfig) -> Result<Self> {
        Ok(Self::from_maze(Maze::generate(config)?))
    }

    /// Wrap an already generated maze
    pub fn from_maze(maze: Maze) -> Self {
        Self {
            maze,
            solution: None,
        }
    }

    /// The current maze
    #[inline]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// The current solution, if one has been computed
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Replace the maze with a freshly generated one
    ///
    /// # Errors
    ///
    /// Same as [`Maze::generate`]; on error nothing is changed.
    pub fn regenerate(&mut self, config: &MazeConfig) -> Result<()> {
        self.regenerate_with_provider(config, &SpadeProvider)
    }

    /// Replace the maze using a custom geometry provider
    ///
    /// # Errors
    ///
    /// Same as [`Maze::generate`]; on error nothing is changed.
    pub fn regenerate_with_provider<P: GeometryProvider>(
        &mut self,
        config: &MazeConfig,
        provider: &P,
    ) -> Result<()> {
        let maze = Maze::generate_with_provider(config, provider)?;
        self.maze = maze;
        self.solution = None;
        Ok(())
    }

    /// Solve the current maze and keep the result
    pub fn solve(&mut self) -> &Solution {
        self.solution.insert(self.maze.solve())
    }

    /// Forget the current solution
    pub fn clear_solution(&mut self) {
        self.solution = None;
    }
}
