//! Delaunay triangulation and clipped Voronoi cells
//!
//! Generation only talks to the diagram through the [`GeometryProvider`] and
//! [`Diagram`] traits. The default provider wraps spade's planar Delaunay
//! triangulation; a cell polygon is the bounding box cut by the perpendicular
//! bisector of every Delaunay neighbor, which is exactly the bounded Voronoi
//! region of that site.

use glam::DVec2;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashMap;

use super::polygon::{clip_to_bisector, BoundingBox};
use crate::error::{MazeError, Result};

/// Source of triangulations for a set of sites
///
/// Generation calls [`GeometryProvider::triangulate`] once per relaxation
/// iteration and once more for the final diagram. Implementations must not
/// depend on being called in any particular order.
pub trait GeometryProvider {
    /// Diagram produced for one set of sites
    type Diagram: Diagram;

    /// Triangulate the given sites
    ///
    /// Site `i` of the slice is addressed as id `i` in the returned diagram.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if a site cannot be triangulated.
    fn triangulate(&self, sites: &[DVec2]) -> Result<Self::Diagram>;
}

/// Read-only view of one triangulation
pub trait Diagram {
    /// Candidate neighbor ids of a site (sorted ascending, no duplicates)
    fn neighbors(&self, id: usize) -> Vec<usize>;

    /// Voronoi region of a site clipped to `bounds`
    ///
    /// Returns `None` when the site has no usable region, for example when it
    /// coincides with an earlier site.
    fn clipped_polygon(&self, id: usize, bounds: &BoundingBox) -> Option<Vec<DVec2>>;
}

/// Geometry provider backed by spade's Delaunay triangulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeProvider;

impl GeometryProvider for SpadeProvider {
    type Diagram = SpadeDiagram;

    fn triangulate(&self, sites: &[DVec2]) -> Result<SpadeDiagram> {
        SpadeDiagram::new(sites)
    }
}

/// Triangulation of one site set, as built by [`SpadeProvider`]
pub struct SpadeDiagram {
    sites: Vec<DVec2>,
    triangulation: DelaunayTriangulation<Point2<f64>>,
    /// Vertex each site landed on
    vertex_of_site: Vec<FixedVertexHandle>,
    /// First site inserted at each vertex
    owner_of_vertex: HashMap<FixedVertexHandle, usize>,
}

impl SpadeDiagram {
    /// Insert every site into a fresh triangulation
    ///
    /// Spade merges coincident points into a single vertex. Only the first
    /// site at a position owns the vertex; later duplicates get no region.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if spade rejects a coordinate (NaN,
    /// infinite or out of its supported range).
    pub fn new(sites: &[DVec2]) -> Result<Self> {
        let mut triangulation = DelaunayTriangulation::<Point2<f64>>::new();
        let mut vertex_of_site = Vec::with_capacity(sites.len());
        let mut owner_of_vertex = HashMap::with_capacity(sites.len());

        for (id, site) in sites.iter().enumerate() {
            let handle = triangulation
                .insert(Point2::new(site.x, site.y))
                .map_err(|error| {
                    MazeError::GenerationFailed(format!(
                        "site {} at ({}, {}) could not be triangulated: {:?}",
                        id, site.x, site.y, error
                    ))
                })?;
            vertex_of_site.push(handle);
            owner_of_vertex.entry(handle).or_insert(id);
        }

        Ok(Self {
            sites: sites.to_vec(),
            triangulation,
            vertex_of_site,
            owner_of_vertex,
        })
    }

    /// Number of distinct vertices in the triangulation
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.triangulation.num_vertices()
    }

    fn owned_vertex(&self, id: usize) -> Option<FixedVertexHandle> {
        let handle = *self.vertex_of_site.get(id)?;
        (self.owner_of_vertex.get(&handle) == Some(&id)).then_some(handle)
    }
}

impl Diagram for SpadeDiagram {
    fn neighbors(&self, id: usize) -> Vec<usize> {
        let Some(handle) = self.owned_vertex(id) else {
            return Vec::new();
        };
        if self.triangulation.num_vertices() < 2 {
            return Vec::new();
        }

        let mut neighbors: Vec<usize> = self
            .triangulation
            .vertex(handle)
            .out_edges()
            .filter_map(|edge| self.owner_of_vertex.get(&edge.to().fix()).copied())
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    fn clipped_polygon(&self, id: usize, bounds: &BoundingBox) -> Option<Vec<DVec2>> {
        self.owned_vertex(id)?;
        let site = self.sites[id];

        let mut polygon = bounds.corners();
        for neighbor in self.neighbors(id) {
            polygon = clip_to_bisector(&polygon, site, self.sites[neighbor]);
            if polygon.len() < 3 {
                return None;
            }
        }

        Some(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::polygon::polygon_area;

    fn grid_sites() -> Vec<DVec2> {
        // 3x3 grid with a slight shear so no four sites are cocircular
        let mut sites = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                sites.push(DVec2::new(
                    15.0 + 30.0 * col as f64 + 0.7 * row as f64,
                    15.0 + 30.0 * row as f64 + 0.3 * col as f64,
                ));
            }
        }
        sites
    }

    #[test]
    fn test_single_site_gets_whole_domain() {
        let diagram = SpadeProvider.triangulate(&[DVec2::new(3.0, 4.0)]).unwrap();
        let bounds = BoundingBox::square(10.0);

        assert!(diagram.neighbors(0).is_empty());
        let polygon = diagram.clipped_polygon(0, &bounds).unwrap();
        assert!((polygon_area(&polygon) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_sites_split_domain() {
        let sites = [DVec2::new(2.0, 5.0), DVec2::new(8.0, 5.0)];
        let diagram = SpadeProvider.triangulate(&sites).unwrap();
        let bounds = BoundingBox::square(10.0);

        assert_eq!(diagram.neighbors(0), vec![1]);
        assert_eq!(diagram.neighbors(1), vec![0]);

        let left = diagram.clipped_polygon(0, &bounds).unwrap();
        let right = diagram.clipped_polygon(1, &bounds).unwrap();
        assert!((polygon_area(&left) - 50.0).abs() < 1e-9);
        assert!((polygon_area(&right) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygons_tile_the_domain() {
        let sites = grid_sites();
        let diagram = SpadeProvider.triangulate(&sites).unwrap();
        let bounds = BoundingBox::square(90.0);

        let total: f64 = (0..sites.len())
            .map(|id| polygon_area(&diagram.clipped_polygon(id, &bounds).unwrap()).abs())
            .sum();
        assert!((total - 8100.0).abs() < 1e-6);
    }

    #[test]
    fn test_neighbors_are_symmetric_and_sorted() {
        let sites = grid_sites();
        let diagram = SpadeProvider.triangulate(&sites).unwrap();

        for id in 0..sites.len() {
            let neighbors = diagram.neighbors(id);
            assert!(neighbors.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(!neighbors.contains(&id));
            for &other in &neighbors {
                assert!(diagram.neighbors(other).contains(&id));
            }
        }

        // The center of the grid touches all four orthogonal neighbors
        let center = diagram.neighbors(4);
        for id in [1, 3, 5, 7] {
            assert!(center.contains(&id));
        }
    }

    #[test]
    fn test_duplicate_site_has_no_region() {
        let sites = [
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(2.0, 2.0),
        ];
        let diagram = SpadeProvider.triangulate(&sites).unwrap();
        let bounds = BoundingBox::square(10.0);

        assert_eq!(diagram.vertex_count(), 2);
        assert!(diagram.clipped_polygon(0, &bounds).is_some());
        assert!(diagram.clipped_polygon(2, &bounds).is_none());
        assert!(diagram.neighbors(2).is_empty());
        assert_eq!(diagram.neighbors(1), vec![0]);
    }

    #[test]
    fn test_unknown_id() {
        let diagram = SpadeProvider.triangulate(&[DVec2::new(1.0, 1.0)]).unwrap();
        assert!(diagram.neighbors(5).is_empty());
        assert!(diagram.clipped_polygon(5, &BoundingBox::square(2.0)).is_none());
    }

    #[test]
    fn test_rejects_nan_site() {
        let result = SpadeProvider.triangulate(&[DVec2::new(f64::NAN, 1.0)]);
        assert!(matches!(result, Err(MazeError::GenerationFailed(_))));
    }
}
