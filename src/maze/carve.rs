//! Randomized Kruskal carving
//!
//! Every adjacency gets a random weight; walking the edges from lightest to
//! heaviest and opening each one that joins two separate regions yields a
//! random spanning tree, i.e. a perfect maze.

use petgraph::unionfind::UnionFind;
use std::collections::btree_set::{self, BTreeSet};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::rng::MazeRng;

/// An opened wall between two adjacent cells
///
/// Stored canonically with the smaller id first, so `Passage::new(a, b)` and
/// `Passage::new(b, a)` are equal. Serialized as a `[low, high]` pair;
/// deserialization goes through [`Passage::new`], so either order is accepted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "(usize, usize)", into = "(usize, usize)")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Passage {
    low: usize,
    high: usize,
}

impl Passage {
    /// Create a passage between two cells (order does not matter)
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The two cell ids, smaller first
    #[inline]
    pub fn cells(&self) -> (usize, usize) {
        (self.low, self.high)
    }

    /// Whether the passage touches a cell
    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.low == id || self.high == id
    }

    /// The cell on the other side of `id`
    pub fn other(&self, id: usize) -> Option<usize> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Passage {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

impl From<Passage> for (usize, usize) {
    fn from(passage: Passage) -> Self {
        passage.cells()
    }
}

/// Set of open passages of a maze
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassageSet {
    passages: BTreeSet<Passage>,
}

impl PassageSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a passage; returns `false` if it was already open
    pub fn insert(&mut self, passage: Passage) -> bool {
        self.passages.insert(passage)
    }

    /// Whether a passage joins `a` and `b`
    #[inline]
    pub fn connects(&self, a: usize, b: usize) -> bool {
        self.passages.contains(&Passage::new(a, b))
    }

    /// Number of passages
    #[inline]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether no passage is open
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Passages in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, Passage> {
        self.passages.iter()
    }

    /// Passages touching a cell
    ///
    /// This is a linear scan over the whole set; callers walking the maze
    /// should go through [`Cell::neighbors`] and [`PassageSet::connects`].
    pub fn passages_of(&self, id: usize) -> impl Iterator<Item = &Passage> + '_ {
        self.passages.iter().filter(move |passage| passage.contains(id))
    }
}

impl<'a> IntoIterator for &'a PassageSet {
    type Item = &'a Passage;
    type IntoIter = btree_set::Iter<'a, Passage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Passage> for PassageSet {
    fn from_iter<I: IntoIterator<Item = Passage>>(iter: I) -> Self {
        Self {
            passages: iter.into_iter().collect(),
        }
    }
}

/// Candidate wall with its random weight
#[derive(Debug, Clone, Copy)]
struct WeightedEdge {
    cell1: usize,
    cell2: usize,
    weight: f64,
}

/// Carve a perfect maze over the cell graph
///
/// Draws one weight per undirected adjacency, enumerated with cells in slice
/// order and neighbors in ascending id order, then runs Kruskal's algorithm.
/// On a connected graph of N cells the result has exactly N − 1 passages; on
/// a disconnected graph it is a spanning forest.
pub fn carve_passages(cells: &[Cell], rng: &mut MazeRng) -> PassageSet {
    // Step 1: Enumerate each adjacency once and weight it
    let mut edges = Vec::new();
    for cell in cells {
        for &neighbor_id in cell.neighbors.keys() {
            if cell.id < neighbor_id {
                edges.push(WeightedEdge {
                    cell1: cell.id,
                    cell2: neighbor_id,
                    weight: rng.next_f64(),
                });
            }
        }
    }

    // Step 2: Lightest first; the sort is stable, so equal weights keep
    // enumeration order
    edges.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    // Step 3: One singleton set per cell id
    let id_span = cells
        .iter()
        .flat_map(|cell| std::iter::once(cell.id).chain(cell.neighbors.keys().copied()))
        .max()
        .map_or(0, |max_id| max_id + 1);
    let mut sets = UnionFind::<usize>::new(id_span);

    // Step 4: Open every wall that joins two separate regions
    let mut passages = PassageSet::new();
    for edge in &edges {
        if sets.union(edge.cell1, edge.cell2) {
            passages.insert(Passage::new(edge.cell1, edge.cell2));
        }
    }

    debug!(
        cells = cells.len(),
        candidates = edges.len(),
        passages = passages.len(),
        "carved maze"
    );

    passages
}
