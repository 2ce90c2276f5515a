//! Voronoi-based maze generation
//!
//! A standalone library that scatters random sites over a square, evens them
//! out with Lloyd's relaxation, links the resulting Voronoi cells through
//! their shared edges and carves a perfect maze over that graph with a
//! randomized Kruskal's algorithm. Start and end are the two most distant
//! cells; a breadth-first solver produces the route and a polyline for
//! drawing it.
//!
//! The same seed string always produces the same maze.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_maze::*;
//!
//! // Generate a maze
//! let config = MazeConfigBuilder::new()
//!     .seed("abc")
//!     .cell_count(300).unwrap()
//!     .domain_size(800.0).unwrap()
//!     .relaxation_iterations(2)
//!     .build().unwrap();
//!
//! let maze = Maze::generate(&config).unwrap();
//!
//! // Solve it and draw the route
//! let solution = maze.solve();
//! println!("{} cells from start to end", solution.len());
//!
//! // Fill mesh for rendering
//! let mesh = generate_mesh(&maze);
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, cells and passages

// Modules
pub mod error;
pub mod config;
pub mod rng;
pub mod cell;
pub mod generation;
pub mod maze;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MazeError, Result};
pub use config::{MazeConfig, MazeConfigBuilder};
pub use rng::MazeRng;
pub use cell::{Cell, SharedEdge};
pub use maze::{Maze, MazeState, Passage, PassageSet, Solution};
pub use mesh::{closed_walls, generate_mesh, passage_openings, MeshData};
pub use generation::polygon::BoundingBox;
pub use generation::{Diagram, GeometryProvider, LloydOptions, SpadeProvider, Tessellation};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
