//! Planar polygon helpers
//!
//! Bounding boxes, half-plane clipping (one Sutherland–Hodgman pass) and
//! area-weighted centroids for cell polygons.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consecutive vertices closer than this are merged after clipping
const VERTEX_EPSILON: f64 = 1e-9;

/// Polygons with a doubled area below this fall back to the vertex average
const AREA_EPSILON: f64 = 1e-12;

/// Axis-aligned rectangle that cell polygons are clipped to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Lower-left corner
    pub min: DVec2,
    /// Upper-right corner
    pub max: DVec2,
}

impl BoundingBox {
    /// Create a bounding box from two corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Square domain `[0, size] × [0, size]`
    pub fn square(size: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::splat(size))
    }

    /// The four corners, counter-clockwise starting at `min`
    pub fn corners(&self) -> Vec<DVec2> {
        vec![
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Whether a point lies inside or on the boundary
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Clip a polygon against the half-plane `(p - origin) · normal <= 0`
///
/// Vertices lying exactly on the boundary line are kept without emitting a
/// duplicate intersection point.
pub fn clip_half_plane(polygon: &[DVec2], origin: DVec2, normal: DVec2) -> Vec<DVec2> {
    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    let Some(&last) = polygon.last() else {
        return clipped;
    };

    let mut previous = last;
    let mut previous_side = (previous - origin).dot(normal);

    for &current in polygon {
        let side = (current - origin).dot(normal);

        if (previous_side < 0.0 && side > 0.0) || (previous_side > 0.0 && side < 0.0) {
            let t = previous_side / (previous_side - side);
            clipped.push(previous + (current - previous) * t);
        }
        if side <= 0.0 {
            clipped.push(current);
        }

        previous = current;
        previous_side = side;
    }

    dedup_ring(clipped)
}

/// Clip a polygon to the side of the bisector of `site`/`other` nearer to `site`
#[inline]
pub fn clip_to_bisector(polygon: &[DVec2], site: DVec2, other: DVec2) -> Vec<DVec2> {
    clip_half_plane(polygon, (site + other) * 0.5, other - site)
}

/// Drop consecutive near-duplicate vertices, including the wrap-around pair
fn dedup_ring(mut ring: Vec<DVec2>) -> Vec<DVec2> {
    ring.dedup_by(|a, b| a.distance_squared(*b) < VERTEX_EPSILON * VERTEX_EPSILON);
    while ring.len() > 1 {
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if first.distance_squared(last) < VERTEX_EPSILON * VERTEX_EPSILON {
            ring.pop();
        } else {
            break;
        }
    }
    ring
}

/// Signed area of a polygon (positive when counter-clockwise)
pub fn polygon_area(polygon: &[DVec2]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice_area: f64 = (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum();
    twice_area * 0.5
}

/// Area-weighted centroid of a polygon
///
/// Degenerate polygons (zero area) fall back to the average of their
/// vertices. Returns `None` for an empty slice.
pub fn polygon_centroid(polygon: &[DVec2]) -> Option<DVec2> {
    let n = polygon.len();
    match n {
        0 => return None,
        1 => return Some(polygon[0]),
        2 => return Some((polygon[0] + polygon[1]) * 0.5),
        _ => {}
    }

    let mut twice_area = 0.0;
    let mut weighted = DVec2::ZERO;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let cross = a.perp_dot(b);
        twice_area += cross;
        weighted += (a + b) * cross;
    }

    if twice_area.abs() < AREA_EPSILON {
        let sum: DVec2 = polygon.iter().copied().sum();
        return Some(sum / n as f64);
    }

    Some(weighted / (3.0 * twice_area))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_square_corners() {
        let bounds = BoundingBox::square(10.0);
        let corners = bounds.corners();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], DVec2::ZERO);
        assert_eq!(corners[2], DVec2::new(10.0, 10.0));
        assert!(polygon_area(&corners) > 0.0, "corners should be counter-clockwise");
    }

    #[test]
    fn test_contains() {
        let bounds = BoundingBox::square(10.0);
        assert!(bounds.contains(DVec2::new(5.0, 5.0)));
        assert!(bounds.contains(DVec2::new(10.0, 0.0)));
        assert!(!bounds.contains(DVec2::new(10.5, 5.0)));
        assert!(!bounds.contains(DVec2::new(5.0, -0.1)));
    }

    #[test]
    fn test_clip_half_plane_cuts_square() {
        let square = BoundingBox::square(10.0).corners();
        // Keep x <= 4
        let clipped = clip_half_plane(&square, DVec2::new(4.0, 0.0), DVec2::X);

        assert_eq!(clipped.len(), 4);
        assert!((polygon_area(&clipped) - 40.0).abs() < 1e-9);
        assert!(clipped.iter().all(|p| p.x <= 4.0 + 1e-12));
    }

    #[test]
    fn test_clip_half_plane_keeps_everything() {
        let square = BoundingBox::square(10.0).corners();
        let clipped = clip_half_plane(&square, DVec2::new(20.0, 0.0), DVec2::X);
        assert_eq!(clipped, square);
    }

    #[test]
    fn test_clip_half_plane_removes_everything() {
        let square = BoundingBox::square(10.0).corners();
        let clipped = clip_half_plane(&square, DVec2::new(-1.0, 0.0), DVec2::X);
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_clip_through_vertices_has_no_duplicates() {
        let square = BoundingBox::square(10.0).corners();
        // Diagonal from (0,0) to (10,10), keep the lower-right triangle
        let clipped = clip_half_plane(&square, DVec2::ZERO, DVec2::new(-1.0, 1.0));

        assert_eq!(clipped.len(), 3);
        assert!((polygon_area(&clipped) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_to_bisector() {
        let square = BoundingBox::square(10.0).corners();
        let left = DVec2::new(2.0, 5.0);
        let right = DVec2::new(8.0, 5.0);

        let clipped = clip_to_bisector(&square, left, right);
        assert!((polygon_area(&clipped) - 50.0).abs() < 1e-9);
        assert!(clipped.iter().all(|p| p.x <= 5.0 + 1e-12));
    }

    #[test]
    fn test_centroid_of_square() {
        let square = BoundingBox::new(DVec2::new(2.0, 2.0), DVec2::new(6.0, 4.0)).corners();
        let centroid = polygon_centroid(&square).unwrap();
        assert!(approx(centroid, DVec2::new(4.0, 3.0)));
    }

    #[test]
    fn test_centroid_ignores_orientation() {
        let mut square = BoundingBox::square(2.0).corners();
        square.reverse();
        let centroid = polygon_centroid(&square).unwrap();
        assert!(approx(centroid, DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_centroid_of_triangle() {
        let triangle = vec![DVec2::ZERO, DVec2::new(3.0, 0.0), DVec2::new(0.0, 3.0)];
        let centroid = polygon_centroid(&triangle).unwrap();
        assert!(approx(centroid, DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_centroid_degenerate() {
        assert_eq!(polygon_centroid(&[]), None);

        let collinear = vec![DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        let centroid = polygon_centroid(&collinear).unwrap();
        assert!(approx(centroid, DVec2::new(1.0, 0.0)));
    }
}
