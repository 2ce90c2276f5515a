//! Cell construction and planar adjacency
//!
//! Turns a diagram into [`Cell`]s and links neighboring cells through the
//! boundary segment they share. Neighboring polygons are clipped
//! independently, so their common vertices only agree up to floating-point
//! noise; vertices are therefore matched on a quantized key.

use glam::DVec2;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::delaunay::Diagram;
use super::polygon::BoundingBox;
use crate::cell::{Cell, SharedEdge};

/// Decimal places used when matching vertices of neighboring polygons
pub const EDGE_PRECISION: i32 = 3;

/// Quantized vertex used to match polygons
type VertexKey = (i64, i64);

fn quantize(point: DVec2) -> VertexKey {
    let scale = 10f64.powi(EDGE_PRECISION);
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
    )
}

/// Create one cell per site that has a clipped polygon
///
/// Sites without a polygon are dropped; the remaining cells keep the index
/// of their site as ID, so IDs may have gaps.
pub fn build_cells<D: Diagram>(diagram: &D, sites: &[DVec2], bounds: &BoundingBox) -> Vec<Cell> {
    sites
        .iter()
        .enumerate()
        .filter_map(|(id, &site)| match diagram.clipped_polygon(id, bounds) {
            Some(polygon) => Some(Cell::new(id, site, polygon)),
            None => {
                debug!(id, x = site.x, y = site.y, "dropping site without a cell polygon");
                None
            }
        })
        .collect()
}

/// Link every pair of adjacent cells through their shared edge
///
/// Candidates come from the diagram's neighbor relation; a candidate only
/// becomes a neighbor if the two polygons really share a boundary segment.
/// The same edge value is recorded on both cells.
pub fn build_neighbor_graph<D: Diagram>(diagram: &D, cells: &mut [Cell]) {
    let index_of: HashMap<usize, usize> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| (cell.id, index))
        .collect();

    let mut edge_count = 0usize;
    for index in 0..cells.len() {
        let cell_id = cells[index].id;

        for candidate in diagram.neighbors(cell_id) {
            let Some(&other) = index_of.get(&candidate) else {
                continue;
            };
            if other == index || cells[index].is_neighbor_of(candidate) {
                continue;
            }

            if let Some(edge) = shared_edge(&cells[index].polygon, &cells[other].polygon) {
                cells[index].neighbors.insert(candidate, edge);
                cells[other].neighbors.insert(cell_id, edge);
                edge_count += 1;
            }
        }
    }

    debug!(cells = cells.len(), edges = edge_count, "built neighbor graph");
}

/// Find the boundary segment shared by two polygons
///
/// Collects the vertices of `polygon1` that also appear (at
/// [`EDGE_PRECISION`]) in `polygon2`, orders them lexicographically and
/// returns the two extremes. Returns `None` when fewer than two vertices are
/// shared or when the extremes collapse onto one quantized point.
///
/// The returned endpoints do not depend on the argument order beyond
/// sub-precision noise.
///
/// # Example
///
/// ```rust
/// use voronoi_maze::generation::shared_edge;
/// use voronoi_maze::DVec2;
///
/// let square = |x: f64| {
///     [
///         DVec2::new(x, 0.0),
///         DVec2::new(x + 1.0, 0.0),
///         DVec2::new(x + 1.0, 1.0),
///         DVec2::new(x, 1.0),
///     ]
/// };
/// let (left, right) = (square(0.0), square(1.0));
///
/// let edge = shared_edge(&left, &right).unwrap();
/// assert_eq!(edge.start, DVec2::new(1.0, 0.0));
/// assert_eq!(edge.end, DVec2::new(1.0, 1.0));
/// ```
pub fn shared_edge(polygon1: &[DVec2], polygon2: &[DVec2]) -> Option<SharedEdge> {
    let keys: HashSet<VertexKey> = polygon2.iter().map(|&point| quantize(point)).collect();

    let mut shared: Vec<(VertexKey, DVec2)> = polygon1
        .iter()
        .map(|&point| (quantize(point), point))
        .filter(|(key, _)| keys.contains(key))
        .collect();

    if shared.len() < 2 {
        return None;
    }

    shared.sort_by(|(key_a, a), (key_b, b)| {
        key_a
            .cmp(key_b)
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    });

    let (first_key, first) = shared[0];
    let (last_key, last) = shared[shared.len() - 1];
    if first_key == last_key {
        return None;
    }

    Some(SharedEdge::new(first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::delaunay::{GeometryProvider, SpadeProvider};
    use crate::generation::points::generate_sites;
    use crate::rng::MazeRng;

    fn square(x: f64, y: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x, y),
            DVec2::new(x + 1.0, y),
            DVec2::new(x + 1.0, y + 1.0),
            DVec2::new(x, y + 1.0),
        ]
    }

    fn build(count: usize, size: f64, seed: &str) -> Vec<Cell> {
        let bounds = BoundingBox::square(size);
        let sites = generate_sites(count, size, &mut MazeRng::from_seed_str(seed));
        let diagram = SpadeProvider.triangulate(&sites).unwrap();
        let mut cells = build_cells(&diagram, &sites, &bounds);
        build_neighbor_graph(&diagram, &mut cells);
        cells
    }

    #[test]
    fn test_shared_edge_of_adjacent_squares() {
        let edge = shared_edge(&square(0.0, 0.0), &square(1.0, 0.0)).unwrap();
        assert_eq!(edge.start, DVec2::new(1.0, 0.0));
        assert_eq!(edge.end, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_shared_edge_absorbs_noise() {
        let mut noisy = square(1.0, 0.0);
        noisy[0] += DVec2::new(1e-7, -1e-7);
        noisy[3] += DVec2::new(-1e-7, 1e-7);

        let edge = shared_edge(&square(0.0, 0.0), &noisy).unwrap();
        assert!(edge.same_segment(
            &SharedEdge::new(DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)),
            1e-12
        ));
    }

    #[test]
    fn test_single_shared_vertex_is_not_an_edge() {
        // Squares touching only at a corner
        assert!(shared_edge(&square(0.0, 0.0), &square(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_disjoint_polygons() {
        assert!(shared_edge(&square(0.0, 0.0), &square(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_collapsed_edge_is_rejected() {
        // Two distinct vertices that quantize to the same key
        let a = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0001, 0.0001),
            DVec2::new(0.0, 1.0),
        ];
        let b = vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
        ];
        assert!(shared_edge(&a, &b).is_none());
    }

    #[test]
    fn test_collinear_shared_vertices_collapse_to_extremes() {
        // Three shared vertices along x = 1
        let a = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 0.5),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let b = vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 0.5),
        ];
        let edge = shared_edge(&a, &b).unwrap();
        assert_eq!(edge.start, DVec2::new(1.0, 0.0));
        assert_eq!(edge.end, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_shared_edge_argument_order() {
        let cells = build(40, 100.0, "swap");
        for cell in &cells {
            for &neighbor_id in cell.neighbors.keys() {
                let neighbor = cells.iter().find(|c| c.id == neighbor_id).unwrap();
                let forward = shared_edge(&cell.polygon, &neighbor.polygon).unwrap();
                let backward = shared_edge(&neighbor.polygon, &cell.polygon).unwrap();
                assert!(forward.same_segment(&backward, 1e-6));
                assert!(forward.start.distance(backward.start) < 1e-6);
            }
        }
    }

    #[test]
    fn test_build_cells_keeps_ids() {
        let cells = build(30, 100.0, "ids");
        assert_eq!(cells.len(), 30);
        for (index, cell) in cells.iter().enumerate() {
            assert_eq!(cell.id, index);
            assert!(cell.polygon.len() >= 3);
        }
    }

    #[test]
    fn test_build_cells_drops_duplicates() {
        let bounds = BoundingBox::square(10.0);
        let sites = vec![
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 8.0),
        ];
        let diagram = SpadeProvider.triangulate(&sites).unwrap();
        let mut cells = build_cells(&diagram, &sites, &bounds);
        build_neighbor_graph(&diagram, &mut cells);

        let ids: Vec<usize> = cells.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(cells[0].is_neighbor_of(2));
        assert!(cells[1].is_neighbor_of(0));
    }

    #[test]
    fn test_neighbor_symmetry() {
        let cells = build(120, 500.0, "symmetry");

        for cell in &cells {
            assert!(cell.neighbor_count() > 0, "cell {} has no neighbors", cell.id);
            for (&neighbor_id, edge) in &cell.neighbors {
                let neighbor = cells.iter().find(|c| c.id == neighbor_id).unwrap();
                let back = neighbor
                    .shared_edge_with(cell.id)
                    .expect("neighbor relationship should be symmetric");
                assert_eq!(edge, back);
                assert!(edge.length() > 0.0);
            }
        }
    }

    #[test]
    fn test_edges_lie_on_both_polygons() {
        let cells = build(50, 200.0, "on-boundary");
        for cell in &cells {
            for edge in cell.neighbors.values() {
                let on_polygon = |point: DVec2| {
                    cell.polygon.iter().any(|v| quantize(*v) == quantize(point))
                };
                assert!(on_polygon(edge.start));
                assert!(on_polygon(edge.end));
            }
        }
    }
}
