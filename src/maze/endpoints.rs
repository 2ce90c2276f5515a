//! Start and end cell selection

use crate::cell::Cell;

/// Pick the two cells whose sites are farthest apart
///
/// Examines every pair `(i, j)` with `i < j` in slice order and keeps the
/// first pair reaching the maximum squared distance. A single cell is paired
/// with itself; an empty slice yields `None`.
///
/// Returns the ids of the start and end cells.
pub fn select_endpoints(cells: &[Cell]) -> Option<(usize, usize)> {
    let first = cells.first()?;
    let mut pair = (first.id, first.id);
    let mut max_distance = f64::NEG_INFINITY;

    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            let distance = a.distance_squared_to(b);
            if distance > max_distance {
                max_distance = distance;
                pair = (a.id, b.id);
            }
        }
    }

    Some(pair)
}
