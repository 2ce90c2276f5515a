//! Mesh generation for Maze
//!
//! Generates engine-agnostic render data: filled cell triangles plus the wall
//! segments that remain closed and the gaps of open passages.

use crate::cell::SharedEdge;
use crate::maze::Maze;
use glam::DVec2;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering backend:
/// - Canvas/SVG: walk `indices` three at a time
/// - wgpu: Use directly as vertex buffers
///
/// `triangle_cells[t]` is the cell that triangle `t` belongs to, so a renderer
/// can colour the start, end and solution cells.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (2D coordinates)
    pub positions: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Owning cell ID of each triangle
    pub triangle_cells: Vec<usize>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate a fill mesh for every cell of a maze
///
/// Each cell is triangulated as a triangle fan from its site to its boundary
/// vertices. Cells with fewer than three vertices are skipped.
pub fn generate_mesh(maze: &Maze) -> MeshData {
    let mut mesh = MeshData::default();

    for cell in maze.cells() {
        if cell.polygon.len() < 3 {
            continue;
        }
        triangulate_cell(cell.id, cell.site, &cell.polygon, &mut mesh);
    }

    mesh
}

/// Triangulate a single cell as a triangle fan
fn triangulate_cell(id: usize, site: DVec2, polygon: &[DVec2], mesh: &mut MeshData) {
    let base_idx = mesh.positions.len() as u32;

    mesh.positions.push([site.x as f32, site.y as f32]);
    for vertex in polygon {
        mesh.positions.push([vertex.x as f32, vertex.y as f32]);
    }

    let num_vertices = polygon.len();
    for i in 0..num_vertices {
        let next_i = (i + 1) % num_vertices;
        mesh.indices.push(base_idx);
        mesh.indices.push(base_idx + 1 + i as u32);
        mesh.indices.push(base_idx + 1 + next_i as u32);
        mesh.triangle_cells.push(id);
    }
}

/// Gaps to knock out of the walls for every open passage
///
/// Each opening is the centred part of the shared edge covering
/// `width_ratio` of its length (clamped to [0, 1]).
pub fn passage_openings(maze: &Maze, width_ratio: f64) -> Vec<SharedEdge> {
    maze.passage_edges()
        .map(|(_, edge)| edge.opening(width_ratio))
        .collect()
}

/// Shared edges between adjacent cells that stay closed
///
/// Each interior wall is reported once. The outer boundary of the domain is
/// not included; renderers draw it from the cell polygons.
pub fn closed_walls(maze: &Maze) -> Vec<SharedEdge> {
    let passages = maze.passages();
    maze.cells()
        .iter()
        .flat_map(|cell| {
            cell.neighbors
                .iter()
                .filter(move |(&other, _)| cell.id < other && !passages.connects(cell.id, other))
                .map(|(_, edge)| *edge)
        })
        .collect()
}
