//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively evens out cell sizes by moving each site to
//! the centroid of its clipped Voronoi cell.

use glam::DVec2;
use std::time::Instant;
use tracing::debug;

use super::delaunay::{Diagram, GeometryProvider};
use super::polygon::{polygon_centroid, BoundingBox};
use crate::error::Result;

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold as a fraction of the domain width
    ///
    /// Stop early once the largest displacement in an iteration falls below
    /// `threshold * width`. Set to 0.0 to always run `max_iterations`.
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply a fixed number of Lloyd iterations
///
/// # Arguments
///
/// * `sites` - Initial site distribution
/// * `bounds` - Domain the cell polygons are clipped to
/// * `iterations` - Number of relaxation iterations (0 returns the input)
/// * `provider` - Source of the Voronoi diagram for each iteration
///
/// # Errors
///
/// Propagates any triangulation failure from the provider.
pub fn lloyd_relaxation<P: GeometryProvider>(
    sites: Vec<DVec2>,
    bounds: &BoundingBox,
    iterations: usize,
    provider: &P,
) -> Result<Vec<DVec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(sites, bounds, options, provider)
}

/// Apply Lloyd's Relaxation with custom options
///
/// A site whose diagram has no polygon for it (a degenerate configuration)
/// stays where it is for that iteration.
///
/// # Errors
///
/// Propagates any triangulation failure from the provider.
pub fn lloyd_relaxation_with_options<P: GeometryProvider>(
    mut sites: Vec<DVec2>,
    bounds: &BoundingBox,
    options: LloydOptions,
    provider: &P,
) -> Result<Vec<DVec2>> {
    let width = (bounds.max.x - bounds.min.x).max(bounds.max.y - bounds.min.y);
    let convergence_threshold = options.convergence_threshold * width;
    let total_start = Instant::now();

    let mut iterations_run = 0;
    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let diagram = provider.triangulate(&sites)?;

        let (relaxed, max_displacement) = compute_new_sites(&sites, &diagram, bounds);
        sites = relaxed;
        iterations_run = iteration + 1;

        debug!(
            iteration = iterations_run,
            max_displacement,
            elapsed = ?iter_start.elapsed(),
            "lloyd iteration"
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            debug!(
                iteration = iterations_run,
                threshold = convergence_threshold,
                "lloyd relaxation converged"
            );
            break;
        }
    }

    debug!(
        sites = sites.len(),
        iterations = iterations_run,
        max_iterations = options.max_iterations,
        elapsed = ?total_start.elapsed(),
        "lloyd relaxation finished"
    );

    Ok(sites)
}

/// Move every site to its cell centroid and track the largest move
fn compute_new_sites<D: Diagram>(
    sites: &[DVec2],
    diagram: &D,
    bounds: &BoundingBox,
) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;

    let relaxed = sites
        .iter()
        .enumerate()
        .map(|(id, &site)| {
            let moved = diagram
                .clipped_polygon(id, bounds)
                .and_then(|polygon| polygon_centroid(&polygon))
                .unwrap_or(site);
            max_displacement = max_displacement.max(moved.distance(site));
            moved
        })
        .collect();

    (relaxed, max_displacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::delaunay::SpadeProvider;
    use crate::generation::points::generate_sites;
    use crate::rng::MazeRng;

    fn nearest_neighbor_spread(sites: &[DVec2]) -> f64 {
        let distances: Vec<f64> = sites
            .iter()
            .enumerate()
            .map(|(i, a)| {
                sites
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, b)| a.distance(*b))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let max = distances.iter().copied().fold(0.0, f64::max);
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        max / min
    }

    #[test]
    fn test_lloyd_relaxation_keeps_sites_in_bounds() {
        let bounds = BoundingBox::square(100.0);
        let mut rng = MazeRng::from_seed_str("lloyd");
        let sites = generate_sites(60, 100.0, &mut rng);

        let relaxed = lloyd_relaxation(sites, &bounds, 3, &SpadeProvider).unwrap();

        assert_eq!(relaxed.len(), 60);
        for site in &relaxed {
            assert!(bounds.contains(*site));
        }
    }

    #[test]
    fn test_lloyd_relaxation_evens_spacing() {
        let bounds = BoundingBox::square(100.0);
        let mut rng = MazeRng::from_seed_str("spacing");
        let sites = generate_sites(80, 100.0, &mut rng);
        let before = nearest_neighbor_spread(&sites);

        let relaxed = lloyd_relaxation(sites, &bounds, 8, &SpadeProvider).unwrap();
        let after = nearest_neighbor_spread(&relaxed);

        assert!(after < before, "spread {after} should be below {before}");
    }

    #[test]
    fn test_lloyd_relaxation_zero_iterations() {
        let bounds = BoundingBox::square(10.0);
        let sites = vec![DVec2::new(1.0, 1.0), DVec2::new(9.0, 2.0)];
        let relaxed = lloyd_relaxation(sites.clone(), &bounds, 0, &SpadeProvider).unwrap();
        assert_eq!(relaxed, sites);
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let bounds = BoundingBox::square(50.0);
        let sites1 = generate_sites(40, 50.0, &mut MazeRng::from_seed_str("same"));
        let sites2 = generate_sites(40, 50.0, &mut MazeRng::from_seed_str("same"));

        let relaxed1 = lloyd_relaxation(sites1, &bounds, 2, &SpadeProvider).unwrap();
        let relaxed2 = lloyd_relaxation(sites2, &bounds, 2, &SpadeProvider).unwrap();

        assert_eq!(relaxed1, relaxed2);
    }

    #[test]
    fn test_single_site_moves_to_domain_center() {
        let bounds = BoundingBox::square(10.0);
        let relaxed =
            lloyd_relaxation(vec![DVec2::new(1.0, 2.0)], &bounds, 1, &SpadeProvider).unwrap();
        assert!(relaxed[0].distance(DVec2::new(5.0, 5.0)) < 1e-9);
    }

    #[test]
    fn test_duplicate_site_stays_put() {
        let bounds = BoundingBox::square(10.0);
        let sites = vec![
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(2.0, 2.0),
        ];
        let relaxed = lloyd_relaxation(sites, &bounds, 1, &SpadeProvider).unwrap();
        assert_eq!(relaxed[2], DVec2::new(2.0, 2.0));
        assert_ne!(relaxed[0], DVec2::new(2.0, 2.0));
    }

    #[test]
    fn test_convergence_stops_early() {
        let bounds = BoundingBox::square(10.0);
        // Already at the centroid: the first iteration moves nothing
        let options = LloydOptions {
            max_iterations: 50,
            convergence_threshold: 0.01,
        };
        let relaxed = lloyd_relaxation_with_options(
            vec![DVec2::new(5.0, 5.0)],
            &bounds,
            options,
            &SpadeProvider,
        )
        .unwrap();
        assert!(relaxed[0].distance(DVec2::new(5.0, 5.0)) < 1e-9);
    }

    #[test]
    fn test_lloyd_options_default() {
        let options = LloydOptions::default();
        assert_eq!(options.max_iterations, 2);
        assert_eq!(options.convergence_threshold, 0.0);
    }
}
