//! Breadth-first maze solver
//!
//! Walks only through open passages. On a perfect maze the route found is
//! the unique one; on a graph with redundant passages it is a shortest one.

use glam::DVec2;
use std::collections::{HashMap, HashSet, VecDeque};

use super::carve::PassageSet;
use crate::cell::Cell;

/// Route from the start cell to the end cell
///
/// An empty solution means the end is unreachable from the start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    path: Vec<usize>,
    polyline: Vec<DVec2>,
}

impl Solution {
    /// Wrap a cell path and derive its polyline
    pub fn new(path: Vec<usize>, cells: &[Cell]) -> Self {
        let polyline = solution_polyline(&path, cells);
        Self { path, polyline }
    }

    /// Cell ids from start to end inclusive
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Whether no route was found
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of cells on the route
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Sites joined through the midpoints of the crossed walls
    #[inline]
    pub fn polyline(&self) -> &[DVec2] {
        &self.polyline
    }

    /// Prefix of the polyline revealed after `step` animation steps
    ///
    /// Each step advances one cell, i.e. two polyline points (the wall
    /// midpoint and the next site). Step 0 is just the start site; any step
    /// past the end returns the whole polyline.
    pub fn polyline_until(&self, step: usize) -> &[DVec2] {
        if self.polyline.is_empty() {
            return &self.polyline;
        }
        let last = self.polyline.len() - 1;
        let end = step.saturating_mul(2).min(last);
        &self.polyline[..=end]
    }
}

fn index_cells(cells: &[Cell]) -> HashMap<usize, &Cell> {
    cells.iter().map(|cell| (cell.id, cell)).collect()
}

/// Find the route between two cells through open passages
///
/// Returns an empty path when `end` cannot be reached or either id has no
/// cell, and `[start]` when both ids are the same cell.
pub fn find_path(cells: &[Cell], passages: &PassageSet, start: usize, end: usize) -> Vec<usize> {
    let by_id = index_cells(cells);
    if !by_id.contains_key(&start) || !by_id.contains_key(&end) {
        return Vec::new();
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut came_from: HashMap<usize, usize> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == end {
            return rebuild_path(&came_from, start, end);
        }

        let Some(cell) = by_id.get(&current) else {
            continue;
        };
        for &neighbor_id in cell.neighbors.keys() {
            if !passages.connects(current, neighbor_id) || !visited.insert(neighbor_id) {
                continue;
            }
            came_from.insert(neighbor_id, current);
            queue.push_back(neighbor_id);
        }
    }

    Vec::new()
}

fn rebuild_path(came_from: &HashMap<usize, usize>, start: usize, end: usize) -> Vec<usize> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Polyline through a cell path for renderers
///
/// Alternates each cell's site with the midpoint of the wall leading to the
/// next cell. A step without a shared edge contributes only the site.
pub fn solution_polyline(path: &[usize], cells: &[Cell]) -> Vec<DVec2> {
    let by_id = index_cells(cells);
    let mut points = Vec::with_capacity(path.len() * 2);

    let mut previous: Option<&Cell> = None;
    for id in path {
        let Some(&cell) = by_id.get(id) else {
            continue;
        };
        if let Some(edge) = previous.and_then(|prev| prev.shared_edge_with(cell.id)) {
            points.push(edge.midpoint());
        }
        points.push(cell.site);
        previous = Some(cell);
    }

    points
}

/// Solve between two cells and derive the polyline
pub fn solve(cells: &[Cell], passages: &PassageSet, start: usize, end: usize) -> Solution {
    Solution::new(find_path(cells, passages, start, end), cells)
}
