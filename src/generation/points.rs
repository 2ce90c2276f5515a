//! Random site distribution
//!
//! Scatters sites uniformly over the square domain. The draw order (x, then
//! y, site by site) is part of the reproducibility contract: changing it
//! changes every seeded maze.

use glam::DVec2;

use crate::rng::MazeRng;

/// Generate uniformly random sites in `[0, size) × [0, size)`
///
/// Consumes exactly two draws per site.
///
/// # Example
///
/// ```rust
/// use voronoi_maze::generation::generate_sites;
/// use voronoi_maze::MazeRng;
///
/// let mut rng = MazeRng::from_seed_str("abc");
/// let sites = generate_sites(5, 100.0, &mut rng);
/// assert_eq!(sites.len(), 5);
/// ```
pub fn generate_sites(count: usize, size: f64, rng: &mut MazeRng) -> Vec<DVec2> {
    (0..count)
        .map(|_| {
            let x = rng.next_scaled(size);
            let y = rng.next_scaled(size);
            DVec2::new(x, y)
        })
        .collect()
}
