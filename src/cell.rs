//! Maze Cell Structure
//!
//! Represents an individual tessellation cell with its site, boundary polygon
//! and the shared edges to its neighbors.

use glam::DVec2;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Boundary segment shared by two adjacent cells
///
/// The same value is stored on both cells of an adjacency, so the two sides
/// always agree on the wall geometry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedEdge {
    /// First endpoint (lexicographically smaller at edge precision)
    pub start: DVec2,
    /// Second endpoint
    pub end: DVec2,
}

impl SharedEdge {
    /// Create a new shared edge
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Midpoint of the segment, where a solution path crosses the wall
    #[inline]
    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) * 0.5
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Check whether two edges describe the same segment, in either direction
    pub fn same_segment(&self, other: &SharedEdge, tolerance: f64) -> bool {
        let close = |a: DVec2, b: DVec2| a.distance(b) <= tolerance;
        (close(self.start, other.start) && close(self.end, other.end))
            || (close(self.start, other.end) && close(self.end, other.start))
    }

    /// Centred sub-segment covering `width_ratio` of the edge
    ///
    /// This is the gap a renderer knocks out of the wall to draw an open
    /// passage. The ratio is clamped to [0, 1].
    pub fn opening(&self, width_ratio: f64) -> SharedEdge {
        let gap = (1.0 - width_ratio.clamp(0.0, 1.0)) / 2.0;
        let direction = self.end - self.start;
        SharedEdge::new(self.start + direction * gap, self.end - direction * gap)
    }
}

/// A single tessellation cell of the maze
///
/// Each cell has:
/// - An ID equal to the index of the site it was grown from
/// - The site itself (where a solution path passes through the cell)
/// - The clipped boundary polygon for rendering
/// - The shared edge to every adjacent cell
///
/// Cell IDs are not renumbered when a degenerate site is dropped, so a
/// maze's IDs may contain gaps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Identifier of this cell (index of its site)
    pub id: usize,

    /// Site point the cell was grown from
    pub site: DVec2,

    /// Vertices of the clipped cell region
    ///
    /// A closed loop with at least three points. The first vertex is not
    /// repeated at the end.
    pub polygon: Vec<DVec2>,

    /// Adjacent cells and the boundary segment shared with each
    ///
    /// Ordered by neighbor ID, which keeps carving and solving reproducible.
    pub neighbors: BTreeMap<usize, SharedEdge>,
}

impl Cell {
    /// Create a new cell without neighbors
    ///
    /// This is typically called during tessellation, not by user code.
    pub fn new(id: usize, site: DVec2, polygon: Vec<DVec2>) -> Self {
        Self {
            id,
            site,
            polygon,
            neighbors: BTreeMap::new(),
        }
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains_key(&other_cell_id)
    }

    /// Get the edge shared with a neighbor, if any
    #[inline]
    pub fn shared_edge_with(&self, other_cell_id: usize) -> Option<&SharedEdge> {
        self.neighbors.get(&other_cell_id)
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Area of the cell polygon
    pub fn area(&self) -> f64 {
        crate::generation::polygon::polygon_area(&self.polygon).abs()
    }

    /// Squared Euclidean distance between the two cells' sites
    #[inline]
    pub fn distance_squared_to(&self, other: &Cell) -> f64 {
        self.site.distance_squared(other.site)
    }
}
